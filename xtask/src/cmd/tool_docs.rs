//! Cross-check `#[tool(name = ...)]` registrations and their REST routes against
//! the README tool tables.
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{fs, markdown, repo};

const TOOLS_DIR: &str = "src/tools/cheat_engine";
const CATALOG: &str = "src/tools/catalog.rs";
const CLIENT: &str = "src/tools/cheat_engine/client.rs";
const README_SECTION: &str = "Tools";

/// Method and endpoint of one tool; `local` tools have an empty endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Route {
    method: String,
    endpoint: String,
}

impl Route {
    fn new(method: &str, endpoint: &str) -> Self {
        Self {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    fn describe(&self) -> String {
        if self.endpoint.is_empty() {
            self.method.clone()
        } else {
            format!("{} `{}`", self.method, self.endpoint)
        }
    }
}

pub fn run(root: Option<PathBuf>) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => repo::repo_root()?,
    };

    let registered = registered_tools(&root.join(TOOLS_DIR))?;
    if registered.is_empty() {
        anyhow::bail!("no #[tool(name = ...)] registrations found under {TOOLS_DIR}");
    }
    let readme = read(&root, "README.md")?;
    let documented = documented_routes(&readme);
    let paths = endpoint_paths(&read(&root, CLIENT)?);
    let routed = catalog_routes(&read(&root, CATALOG)?, &paths)?;

    let mut problems = Vec::new();
    for name in &registered {
        if !documented.contains_key(name) {
            problems.push(format!("`{name}` is registered but missing from README.md"));
        }
        if !routed.contains_key(name) {
            problems.push(format!("`{name}` is registered but has no route in {CATALOG}"));
        }
    }
    for name in documented.keys().filter(|name| !registered.contains(*name)) {
        problems.push(format!("`{name}` is in README.md but not registered"));
    }
    for (name, readme_route) in &documented {
        if let Some(code_route) = routed.get(name) {
            if code_route != readme_route {
                problems.push(format!(
                    "`{name}`: README.md says {}, {CATALOG} routes {}",
                    readme_route.describe(),
                    code_route.describe()
                ));
            }
        }
    }

    if problems.is_empty() {
        println!(
            "README.md documents all {} registered tools and their routes.",
            registered.len()
        );
        return Ok(());
    }

    println!("Tool documentation drift:");
    for problem in problems {
        println!("  - {problem}");
    }
    anyhow::bail!("tool documentation check failed");
}

fn read(root: &Path, relative: &str) -> Result<String> {
    let path = root.join(relative);
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

fn registered_tools(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for path in fs::files_with_extension(dir, "rs")? {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        names.extend(tool_attribute_names(&source));
    }
    Ok(names)
}

/// `name = "..."` values that appear inside `#[tool(...)]` attributes.
fn tool_attribute_names(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_attribute = false;
    for line in source.lines().map(str::trim) {
        if line.starts_with("#[tool(") {
            in_attribute = true;
        }
        if in_attribute {
            if let Some(name) = line
                .split("name = \"")
                .nth(1)
                .and_then(|rest| rest.split('"').next())
            {
                names.push(name.to_string());
            }
            if line.ends_with(")]") {
                in_attribute = false;
            }
        }
    }
    names
}

/// `Endpoint::Variant => "path"` arms of `Endpoint::path`.
fn endpoint_paths(source: &str) -> BTreeMap<String, String> {
    source
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("Endpoint::"))
        .filter_map(|rest| rest.split_once(" => \""))
        .filter_map(|(variant, rest)| {
            rest.split('"')
                .next()
                .map(|path| (variant.trim().to_string(), path.to_string()))
        })
        .collect()
}

/// `("tool", post(Endpoint::X))` / `("tool", ToolRoute::Local)` entries of the route table.
fn catalog_routes(
    source: &str,
    paths: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Route>> {
    let mut routes = BTreeMap::new();
    for line in source.lines().map(str::trim) {
        let Some(rest) = line.strip_prefix("(\"") else {
            continue;
        };
        let Some((tool, entry)) = rest.split_once('"') else {
            continue;
        };
        let route = if entry.contains("ToolRoute::Local") {
            Route::new("local", "")
        } else {
            let method = if entry.contains("get(Endpoint::") {
                "GET"
            } else if entry.contains("post(Endpoint::") {
                "POST"
            } else {
                anyhow::bail!("cannot read the route of `{tool}` in {CATALOG}: {line}");
            };
            let variant = entry
                .split("Endpoint::")
                .nth(1)
                .and_then(|rest| rest.split(')').next())
                .unwrap_or_default();
            let path = paths.get(variant).with_context(|| {
                format!("`{tool}` routes to Endpoint::{variant}, which has no path in {CLIENT}")
            })?;
            Route::new(method, path)
        };
        routes.insert(tool.to_string(), route);
    }
    Ok(routes)
}

/// Tool, Method and Endpoint cells of each tool row in the README `## Tools` section.
fn documented_routes(readme: &str) -> BTreeMap<String, Route> {
    markdown::section(readme, README_SECTION)
        .into_iter()
        .filter(|line| line.trim().starts_with("| `"))
        .filter_map(|line| {
            let cells: Vec<&str> = line
                .trim()
                .trim_matches('|')
                .split('|')
                .map(|cell| cell.trim().trim_matches('`'))
                .collect();
            let name = *cells.first()?;
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return None;
            }
            let cell = |index: usize| cells.get(index).copied().unwrap_or_default();
            Some((name.to_string(), Route::new(cell(1), cell(2))))
        })
        .collect()
}
