//! What happens once the executable is located
//!
//! The process moves into the executable's directory, exports the dialog
//! settings, and hands the system report to the companion dialog program
//! shipped next to it.

use anyhow::{Context, Result};
use log::debug;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use whereami_common::{COMPANION_NAME, DIALOG_ENV, SHOW_MESSAGE_FLAG};

use crate::paths::replace_all;

#[cfg(unix)]
const NULL_DEVICE: &str = "/dev/null";
#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";

/// Characters with a meaning inside a double-quoted shell word, and their escapes
#[cfg(unix)]
const SHELL_ESCAPES: &[(&str, &str)] = &[("\\", "\\\\"), ("\"", "\\\""), ("$", "\\$"), ("`", "\\`")];
#[cfg(windows)]
const SHELL_ESCAPES: &[(&str, &str)] = &[("\"", "\\\"")];

/// Directory part of `exe`, trailing separator included
#[cfg(unix)]
fn directory_of_exe(exe: &Path) -> OsString {
    use std::os::unix::ffi::OsStrExt;

    let dir = crate::paths::directory_of_bytes(exe.as_os_str().as_bytes());
    std::ffi::OsStr::from_bytes(dir).to_owned()
}

#[cfg(not(unix))]
fn directory_of_exe(exe: &Path) -> OsString {
    crate::paths::directory_of(&exe.to_string_lossy()).into()
}

/// Export the dialog settings and change into the executable's directory
///
/// Returns the new working directory.
///
/// # Errors
/// Returns an error if the directory cannot be entered.
pub fn relocate(exe: &Path) -> Result<PathBuf> {
    for (key, value) in DIALOG_ENV {
        env::set_var(key, value);
    }

    let dir = PathBuf::from(directory_of_exe(exe));
    env::set_current_dir(&dir)
        .with_context(|| format!("Failed to change directory to {}", dir.display()))?;
    debug!("Working directory is now {}", dir.display());
    Ok(dir)
}

/// Escape `message` for use inside a double-quoted shell word
#[must_use]
pub fn escape_for_shell(message: &str) -> String {
    SHELL_ESCAPES
        .iter()
        .fold(message.to_string(), |text, (pattern, replacement)| replace_all(&text, pattern, replacement))
}

/// The dialog program living next to the executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    path: PathBuf,
}

impl Companion {
    /// Find the companion beside `exe`
    ///
    /// `None` when it is missing or when `exe` is the companion itself.
    #[must_use]
    pub fn locate(exe: &Path) -> Option<Self> {
        let mut path = directory_of_exe(exe);
        path.push(COMPANION_NAME);
        let path = PathBuf::from(path);
        if path == exe || !path.is_file() {
            return None;
        }
        Some(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shell equivalent of [`Companion::command`], for logs and for users
    /// re-running it by hand
    #[must_use]
    pub fn command_line(&self, message: &str) -> String {
        format!(
            "\"{}\" {SHOW_MESSAGE_FLAG} \"{}\" > {NULL_DEVICE}",
            escape_for_shell(&self.path.to_string_lossy()),
            escape_for_shell(message)
        )
    }

    /// The companion invocation, with stdout discarded
    ///
    /// Arguments go straight to the program; no shell sees the path or the
    /// message.
    #[must_use]
    pub fn command(&self, message: &str) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.arg(SHOW_MESSAGE_FLAG).arg(message).stdout(Stdio::null());
        cmd
    }

    /// Run the companion and wait for it
    ///
    /// # Errors
    /// Returns an error if the companion cannot be started.
    pub fn show(&self, message: &str) -> Result<ExitStatus> {
        debug!("Running companion: {}", self.command_line(message));
        self.command(message).status().with_context(|| format!("Failed to run {}", self.path.display()))
    }
}
