//! # whereami - Locate the Running Executable
//!
//! whereami answers one question: where on disk is the program that is
//! running right now? Operating systems expose this inconsistently. Some
//! have a self link or a kernel query; OpenBSD has neither, so the path is
//! rebuilt from `argv[0]` the way a shell would have found it, and every
//! candidate is checked against the file the kernel actually executed.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Process Entry (main)                      │
//! └───────────────┬───────────────────────────────┬───────────────┘
//!                 │ resolve                       │ report
//!                 ▼                               ▼
//! ┌───────────────────────────────┐   ┌───────────────────────────┐
//! │            locate             │   │  sysinfo ──▶ report       │
//! │                               │   └─────────────┬─────────────┘
//! │  procfs │ sysctl │ pidpath    │                 │
//! │  module_file                  │                 ▼
//! │  argv0 ──▶ identity (verify)  │   ┌───────────────────────────┐
//! │    ▲                          │   │        companion          │
//! │    └── text_image (kernel)    │──▶│ chdir, env, dialog        │
//! └───────────────────────────────┘   └───────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`locate`]: one strategy per platform capability, selected at build time
//!   - `argv0`: the candidate chain (absolute, `PATH`, default list, `$PWD`,
//!     current directory, then one restart from `$_`)
//!   - `text_image`: the kernel's identity for the process text segment
//! - [`identity`]: device/inode verification of candidate paths
//! - [`paths`]: string helpers for directories and search lists
//! - [`sysinfo`]: single-shot OS, CPU, memory and GPU queries
//! - [`report`]: the labelled system report, as text or JSON
//! - [`companion`]: relocation into the executable's directory and the dialog
//!   companion
//! - [`cli`]: command-line arguments
//! - [`domain`]: `Pid`, `TextImage` and resolver errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Print the resolved path and exit
//! whereami --print-path
//!
//! # Force the argv0 chain and watch each candidate
//! RUST_LOG=debug whereami --strategy argv0 --print-path
//!
//! # Machine-readable report, no dialog
//! whereami --json --no-dialog
//! ```

pub mod cli;
pub mod companion;
pub mod domain;
#[cfg(unix)]
pub mod identity;
pub mod locate;
pub mod paths;
pub mod report;
pub mod sysinfo;
