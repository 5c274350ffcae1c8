//! Domain types providing compile-time safety and self-documentation

use std::ffi::OsString;
use std::fmt;

use whereami_common::FileIdentity;

/// Process ID
///
/// Identifies the running process when querying the kernel for its
/// open-file table or pseudo-filesystem entry. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pid(pub u32);

impl Pid {
    /// The current process
    #[must_use]
    pub fn current() -> Self {
        Pid(std::process::id())
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

impl From<Pid> for i32 {
    #[allow(clippy::cast_possible_wrap)]
    fn from(pid: Pid) -> Self {
        pid.0 as i32
    }
}

/// The kernel's record of a process's text (executable) segment
///
/// `identity` is the baseline every argv0 candidate is verified against.
/// `comm` is the kernel's command name for the process, when it reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextImage {
    pub identity: FileIdentity,
    pub comm: Option<OsString>,
}

impl TextImage {
    #[must_use]
    pub fn new(identity: FileIdentity) -> Self {
        Self { identity, comm: None }
    }

    /// Attach the kernel command name (empty names are dropped)
    #[must_use]
    pub fn with_comm(mut self, comm: impl Into<OsString>) -> Self {
        let comm = comm.into();
        self.comm = (!comm.is_empty()).then_some(comm);
        self
    }
}
