//! # whereami - Main Entry Point
//!
//! Resolves the executable path, prints the system report, then moves into
//! the executable's directory and hands the report to the dialog companion.
//! Every step after resolution is skipped when the path is unknown.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io::{self, Write};

use whereami::cli::{Args, StrategyChoice};
use whereami::companion::{relocate, Companion};
use whereami::locate::{resolve_with, Capability};
use whereami::report::SystemReport;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.to_string().contains("not available on this platform") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let capability = Capability::from(args.strategy);
    if args.strategy != StrategyChoice::Native && capability.strategy().is_none() {
        anyhow::bail!("Strategy '{capability}' is not available on this platform");
    }

    let exe = resolve_with(capability);

    if args.print_path {
        // Raw bytes: a path need not be valid UTF-8.
        let mut line = exe.map(|p| p.into_os_string().into_encoded_bytes()).unwrap_or_default();
        line.push(b'\n');
        io::stdout().write_all(&line).context("Failed to write path")?;
        return Ok(());
    }

    let report = SystemReport::collect(!args.raw_bytes);
    if args.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else if !args.quiet {
        println!("{}", report.to_text());
    }

    if args.no_dialog {
        return Ok(());
    }

    let Some(exe) = exe else {
        warn!("Executable path unknown, skipping relocation and dialog");
        return Ok(());
    };

    if let Err(e) = relocate(&exe) {
        warn!("{e:#}");
    }

    match Companion::locate(&exe) {
        Some(companion) => {
            let status = companion.show(&report.to_text())?;
            if !status.success() {
                warn!("{} exited with {status}", companion.path().display());
            }
        }
        None => info!("No dialog companion next to {}", exe.display()),
    }

    Ok(())
}
