mod cmd;
mod fs;
mod markdown;
mod repo;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Repository maintenance tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the local quality gate (fetch/check/test/fmt/clippy/build).
    Preflight,
    /// Validate internal Markdown links and heading anchors in README.md and docs/.
    CheckDocsLinks {
        /// Markdown files to check (defaults to README.md and docs/*.md)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Check that README.md documents exactly the tools registered in src/tools/cheat_engine.
    ToolDocs {
        /// Repository root to inspect (defaults to the current repository)
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,
    },
}

fn main() {
    if let Err(err) = real_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Preflight => cmd::preflight::run(),
        Command::CheckDocsLinks { files } => cmd::check_docs_links::run(files),
        Command::ToolDocs { root } => cmd::tool_docs::run(root),
    }
}
