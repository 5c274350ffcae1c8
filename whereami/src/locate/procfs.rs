//! Pseudo-filesystem self link (`/proc/self/exe` and friends)

use std::fs;
use std::path::PathBuf;

use super::{Capability, LocateStrategy};
use crate::domain::ResolveError;

/// Linux self link to the executable
pub const LINUX_SELF_EXE: &str = "/proc/self/exe";

/// Solaris/illumos self link to the executable
pub const SOLARIS_SELF_EXE: &str = "/proc/self/path/a.out";

/// Resolve the executable by canonicalizing a procfs self link
#[derive(Debug, Clone, Copy)]
pub struct ProcfsStrategy {
    link: &'static str,
}

impl ProcfsStrategy {
    /// The self link for the target platform
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(any(target_os = "solaris", target_os = "illumos")) {
            Self::with_link(SOLARIS_SELF_EXE)
        } else {
            Self::with_link(LINUX_SELF_EXE)
        }
    }

    #[must_use]
    pub const fn with_link(link: &'static str) -> Self {
        Self { link }
    }
}

impl LocateStrategy for ProcfsStrategy {
    fn capability(&self) -> Capability {
        Capability::ProcfsSelfLink
    }

    fn locate(&self) -> Result<PathBuf, ResolveError> {
        fs::canonicalize(self.link)
            .map_err(|source| ResolveError::Query { strategy: self.capability(), source })
    }
}
