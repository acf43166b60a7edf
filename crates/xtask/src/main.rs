//! Project automation tasks for stockdash

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Project automation tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for outdated dependencies (needs cargo-outdated)
    CheckDeps,
    /// Run all tests
    Test {
        /// Also run tests that need live services
        #[arg(long)]
        live: bool,
    },
    /// Run rustfmt check and clippy lints
    Lint,
    /// Generate test coverage report (needs cargo-llvm-cov)
    Coverage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckDeps => cargo(&["outdated", "--workspace", "--root-deps-only"]),
        Commands::Test { live } => {
            cargo(&["test", "--workspace"])?;
            if live {
                cargo(&["test", "--workspace", "--", "--ignored"])?;
            }
            Ok(())
        }
        Commands::Lint => {
            cargo(&["fmt", "--all", "--check"])?;
            cargo(&[
                "clippy",
                "--workspace",
                "--all-targets",
                "--",
                "-D",
                "warnings",
            ])
        }
        Commands::Coverage => cargo(&["llvm-cov", "--workspace", "--html"]),
    }
}

fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    println!("> cargo {}", args.join(" "));

    let status = Command::new(&cargo)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {cargo}"))?;

    if !status.success() {
        bail!("cargo {} failed with {status}", args.join(" "));
    }
    Ok(())
}
