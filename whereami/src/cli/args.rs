//! CLI argument definitions

use clap::{Parser, ValueEnum};

use crate::locate::Capability;

/// Which resolution strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyChoice {
    /// Best direct query for this platform
    #[default]
    Native,
    /// `/proc` self link
    Procfs,
    /// Rebuild from argv[0] and verify against the kernel
    Argv0,
}

impl From<StrategyChoice> for Capability {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Native => Capability::native(),
            StrategyChoice::Procfs => Capability::ProcfsSelfLink,
            StrategyChoice::Argv0 => Capability::Argv0Chain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "whereami",
    version,
    about = "Locate the running executable and report on the host system",
    after_help = "\
EXAMPLES:
    whereami                                 Report, then open the dialog companion
    whereami --print-path                    Print the executable path only
    whereami --strategy argv0 --print-path   Resolve through argv[0] and PATH
    whereami --json --no-dialog              JSON report on stdout

Set RUST_LOG=debug to see every candidate the resolver tries."
)]
pub struct Args {
    /// Resolution strategy
    #[arg(long, value_enum, default_value_t = StrategyChoice::Native)]
    pub strategy: StrategyChoice,

    /// Print the resolved path (empty line if unknown) and exit
    #[arg(long)]
    pub print_path: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "print_path")]
    pub json: bool,

    /// Report byte counts as plain integers
    #[arg(long)]
    pub raw_bytes: bool,

    /// Do not relocate or launch the dialog companion
    #[arg(long)]
    pub no_dialog: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
