use anyhow::{Context, Result};
use clap::Parser;
use std::process::Command;

/// One target per resolution capability
const TARGETS: &[(&str, bool)] = &[
    ("x86_64-unknown-linux-gnu", false),
    ("x86_64-apple-darwin", false),
    ("x86_64-unknown-freebsd", false),
    ("x86_64-unknown-netbsd", false),
    ("x86_64-pc-windows-gnu", false),
    ("x86_64-unknown-illumos", false),
    // Tier 3: needs nightly and build-std
    ("x86_64-unknown-openbsd", true),
];

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Parser)]
enum Cmd {
    /// Type-check the library for every platform strategy
    CheckTargets {
        /// Check only this target
        #[arg(long)]
        target: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Cmd::CheckTargets { target } => check_targets(target.as_deref())?,
    }

    Ok(())
}

fn check_targets(only: Option<&str>) -> Result<()> {
    let selected: Vec<_> = TARGETS.iter().filter(|(t, _)| only.is_none_or(|o| o == *t)).collect();
    if selected.is_empty() {
        anyhow::bail!("Unknown target: {}", only.unwrap_or_default());
    }

    let mut failed = Vec::new();
    for &&(target, tier3) in &selected {
        let mut cmd = Command::new("cargo");
        if tier3 {
            cmd.arg("+nightly");
        }
        cmd.arg("check").arg("--package").arg("whereami").arg("--lib").arg("--target").arg(target);
        if tier3 {
            cmd.arg("-Z").arg("build-std=std,panic_abort");
        }

        let status = cmd.status().with_context(|| format!("Failed to run cargo for {target}"))?;
        if status.success() {
            println!("✓ {target}");
        } else {
            println!("✗ {target}");
            failed.push(target);
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Check failed for: {}", failed.join(", "));
    }
    Ok(())
}
