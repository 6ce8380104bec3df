use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Result;

use crate::repo;

const CARGO_STEPS: &[(&str, &[&str])] = &[
    ("cargo fetch", &["fetch"]),
    ("cargo fmt -- --check", &["fmt", "--all", "--", "--check"]),
    ("cargo check", &["check", "--workspace"]),
    (
        "cargo clippy -- -D warnings",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    ),
    ("cargo test --all", &["test", "--all"]),
    ("cargo build --release", &["build", "--release"]),
];

pub fn run() -> Result<()> {
    let root = repo::repo_root()?;
    for (label, args) in CARGO_STEPS {
        run_step(&root, label, args)?;
    }

    eprintln!("==> xtask tool-docs");
    super::tool_docs::run(Some(root.clone()))?;
    eprintln!("==> xtask check-docs-links");
    super::check_docs_links::run(Vec::new())?;
    Ok(())
}

fn run_step(root: &Path, label: &str, args: &[&str]) -> Result<()> {
    eprintln!("==> {label}");
    let status = Command::new("cargo")
        .args(args)
        .current_dir(root)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("{label} failed (status {status})");
    }
    Ok(())
}
