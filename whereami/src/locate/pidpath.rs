//! Per-pid path lookup through `proc_pidpath` (macOS)

#![allow(unsafe_code)] // proc_pidpath(3) requires unsafe

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use log::debug;

use super::{Capability, LocateStrategy};
use crate::domain::{Pid, ResolveError};

/// Smallest buffer tried
const INITIAL_CAPACITY: usize = libc::PATH_MAX as usize;

/// Largest buffer `proc_pidpath` accepts (`PROC_PIDPATHINFO_MAXSIZE`)
const MAX_CAPACITY: usize = libc::PROC_PIDPATHINFO_MAXSIZE as usize;

/// Look the executable up by pid
#[derive(Debug, Clone, Copy)]
pub struct PidPathStrategy;

impl LocateStrategy for PidPathStrategy {
    fn capability(&self) -> Capability {
        Capability::PidPathLookup
    }

    fn locate(&self) -> Result<PathBuf, ResolveError> {
        let raw = pid_path(Pid::current())?;
        fs::canonicalize(OsStr::from_bytes(&raw))
            .map_err(|source| ResolveError::Query { strategy: self.capability(), source })
    }
}

/// Path bytes for `pid`, growing the buffer while the result fills it
fn pid_path(pid: Pid) -> Result<Vec<u8>, ResolveError> {
    let mut capacity = INITIAL_CAPACITY;
    let mut attempts = 0;
    loop {
        attempts += 1;
        let mut buf = vec![0u8; capacity];
        #[allow(clippy::cast_possible_truncation)]
        let rc = unsafe {
            libc::proc_pidpath(
                i32::from(pid),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len() as u32,
            )
        };
        if rc <= 0 {
            return Err(ResolveError::Query {
                strategy: Capability::PidPathLookup,
                source: io::Error::last_os_error(),
            });
        }

        #[allow(clippy::cast_sign_loss)]
        let len = rc as usize;
        // A result reaching the end of the buffer may have been cut short.
        if len + 1 < capacity {
            buf.truncate(len);
            return Ok(buf);
        }
        if capacity >= MAX_CAPACITY {
            return Err(ResolveError::Truncated { strategy: Capability::PidPathLookup, attempts });
        }
        debug!("proc_pidpath filled {capacity} bytes, retrying larger");
        capacity = (capacity * 2).min(MAX_CAPACITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_path_matches_current_exe() {
        let path = PidPathStrategy.locate().unwrap();
        let expected = fs::canonicalize(std::env::current_exe().unwrap()).unwrap();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_invalid_pid_fails() {
        assert!(pid_path(Pid(999_999_999)).is_err());
    }
}
