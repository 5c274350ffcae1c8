//! Resolution of the running process's own executable path
//!
//! One [`LocateStrategy`] exists per platform capability:
//! - `procfs`: read a pseudo-filesystem self link (Linux, Solaris/illumos)
//! - `sysctl`: ask the kernel for the path by pid (FreeBSD, DragonFly, NetBSD)
//! - `pidpath`: per-pid path lookup API (macOS)
//! - `module_file`: loader module name (Windows)
//! - `argv0`: reconstruct the path from `argv[0]` and the environment, verifying
//!   each candidate against the kernel's file identity (OpenBSD)
//!
//! [`Capability::native`] picks one at build time; [`resolve_executable_path`]
//! runs it and reports failure as `None`.

use std::fmt;
use std::path::PathBuf;

use log::{debug, info};

use crate::domain::ResolveError;

#[cfg(unix)]
pub mod argv0;
#[cfg(windows)]
pub mod module_file;
#[cfg(target_os = "macos")]
pub mod pidpath;
#[cfg(unix)]
pub mod procfs;
#[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd"))]
pub mod sysctl;
#[cfg(unix)]
pub mod text_image;

#[cfg(unix)]
pub use argv0::{resolve_chain, Argv0Strategy, ChainInputs, Resolution};
#[cfg(unix)]
pub use procfs::ProcfsStrategy;

/// How a platform lets a process learn its own executable path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Symbolic self link in a `/proc`-style filesystem
    ProcfsSelfLink,
    /// Structured kernel query for the path of a pid
    KernelPathSysctl,
    /// Per-pid path lookup API with a caller-sized buffer
    PidPathLookup,
    /// Loader-reported module file name
    ModuleFileName,
    /// No direct query: reconstruct from `argv[0]` and verify
    Argv0Chain,
    Unsupported,
}

impl Capability {
    /// The direct capability of the target this crate was built for
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(any(target_os = "linux", target_os = "solaris", target_os = "illumos")) {
            Self::ProcfsSelfLink
        } else if cfg!(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd")) {
            Self::KernelPathSysctl
        } else if cfg!(target_os = "macos") {
            Self::PidPathLookup
        } else if cfg!(windows) {
            Self::ModuleFileName
        } else if cfg!(target_os = "openbsd") {
            Self::Argv0Chain
        } else {
            Self::Unsupported
        }
    }

    /// Strategy implementing this capability, if it is compiled in
    #[must_use]
    pub fn strategy(self) -> Option<Box<dyn LocateStrategy>> {
        match self {
            #[cfg(unix)]
            Self::ProcfsSelfLink => Some(Box::new(ProcfsStrategy::native())),
            #[cfg(any(target_os = "freebsd", target_os = "dragonfly", target_os = "netbsd"))]
            Self::KernelPathSysctl => Some(Box::new(sysctl::SysctlStrategy)),
            #[cfg(target_os = "macos")]
            Self::PidPathLookup => Some(Box::new(pidpath::PidPathStrategy)),
            #[cfg(windows)]
            Self::ModuleFileName => Some(Box::new(module_file::ModuleFileStrategy)),
            #[cfg(unix)]
            Self::Argv0Chain => Some(Box::new(Argv0Strategy::from_process())),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProcfsSelfLink => "procfs self link",
            Self::KernelPathSysctl => "kernel path sysctl",
            Self::PidPathLookup => "pid path lookup",
            Self::ModuleFileName => "module file name",
            Self::Argv0Chain => "argv0 chain",
            Self::Unsupported => "no strategy",
        };
        f.write_str(name)
    }
}

/// A way of asking "where is my executable?"
///
/// Implementations are single-shot: they either produce an absolute,
/// canonical path or fail, and never retry the whole query themselves.
pub trait LocateStrategy {
    fn capability(&self) -> Capability;

    /// Resolve the running executable
    ///
    /// # Errors
    /// Any failure of the underlying query or of candidate verification.
    fn locate(&self) -> Result<PathBuf, ResolveError>;
}

/// Resolve the running executable with the platform's native strategy
///
/// Returns `None` when the path cannot be determined; callers skip anything
/// that depends on it.
#[must_use]
pub fn resolve_executable_path() -> Option<PathBuf> {
    resolve_with(Capability::native())
}

/// Resolve the running executable with a specific capability
#[must_use]
pub fn resolve_with(capability: Capability) -> Option<PathBuf> {
    let result = match capability.strategy() {
        Some(strategy) => strategy.locate(),
        None => Err(ResolveError::Unsupported(capability)),
    };
    match result {
        Ok(path) => {
            info!("Resolved executable via {capability}: {}", path.display());
            Some(path)
        }
        Err(e) => {
            debug!("Executable path unresolved: {e}");
            None
        }
    }
}
