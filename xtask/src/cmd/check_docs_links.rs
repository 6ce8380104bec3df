use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{fs, markdown, repo};

pub fn run(files: Vec<PathBuf>) -> Result<()> {
    let root = repo::repo_root()?;
    let paths = if files.is_empty() {
        default_files(&root)?
    } else {
        files
            .into_iter()
            .map(|p| if p.is_absolute() { p } else { root.join(p) })
            .collect()
    };

    let mut checker = LinkChecker::default();
    let mut errors = Vec::new();
    for path in &paths {
        let rel = repo::display_rel(&root, path);
        let Ok(text) = std::fs::read_to_string(path) else {
            errors.push(format!("{rel}: file not found or unreadable"));
            continue;
        };
        for link in markdown::links(&text) {
            if link.is_external() {
                continue;
            }
            if let Err(problem) = checker.check(path, &link) {
                errors.push(format!("{rel}:{}: {problem}", link.line));
            }
        }
    }

    if errors.is_empty() {
        println!("All internal links and anchors OK ({} files).", paths.len());
        return Ok(());
    }

    println!("Link check failed:");
    for err in errors {
        println!("  - {err}");
    }
    anyhow::bail!("internal link check failed");
}

fn default_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let readme = root.join("README.md");
    if readme.is_file() {
        out.push(readme);
    }
    out.extend(fs::files_with_extension(&root.join("docs"), "md")?);
    Ok(out)
}

#[derive(Default)]
struct LinkChecker {
    anchors: HashMap<PathBuf, Vec<String>>,
}

impl LinkChecker {
    fn check(&mut self, from: &Path, link: &markdown::Link) -> Result<(), String> {
        let (file, anchor) = link.parts();
        let target = if file.is_empty() {
            from.to_path_buf()
        } else {
            from.parent().unwrap_or_else(|| Path::new(".")).join(file)
        };
        if !target.exists() {
            return Err(format!("missing target file '{file}'"));
        }

        let Some(anchor) = anchor else {
            return Ok(());
        };
        let slug = markdown::slugify(anchor);
        if slug.is_empty() || self.anchors_of(&target).contains(&slug) {
            return Ok(());
        }
        Err(format!("missing anchor '#{slug}' in {}", target.display()))
    }

    fn anchors_of(&mut self, path: &Path) -> &Vec<String> {
        self.anchors.entry(path.to_path_buf()).or_insert_with(|| {
            std::fs::read_to_string(path)
                .map(|text| markdown::anchors(&text))
                .unwrap_or_default()
        })
    }
}
