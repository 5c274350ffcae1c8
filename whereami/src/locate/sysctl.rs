//! Kernel path query through `sysctl` (FreeBSD, DragonFly, NetBSD)

#![allow(unsafe_code)] // sysctl(3) requires unsafe

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use log::debug;

use super::{Capability, LocateStrategy};
use crate::domain::ResolveError;

/// Fill attempts before a truncated result is given up on
const MAX_ATTEMPTS: usize = 3;

/// `kern.proc.pathname` of the current process (pid -1)
#[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
const PATHNAME_MIB: [libc::c_int; 4] =
    [libc::CTL_KERN, libc::KERN_PROC, libc::KERN_PROC_PATHNAME, -1];
#[cfg(target_os = "netbsd")]
const PATHNAME_MIB: [libc::c_int; 4] =
    [libc::CTL_KERN, libc::KERN_PROC_ARGS, -1, libc::KERN_PROC_PATHNAME];

/// Ask the kernel for the executable path by pid
#[derive(Debug, Clone, Copy)]
pub struct SysctlStrategy;

impl LocateStrategy for SysctlStrategy {
    fn capability(&self) -> Capability {
        Capability::KernelPathSysctl
    }

    fn locate(&self) -> Result<PathBuf, ResolveError> {
        let raw = query_pathname()?;
        fs::canonicalize(OsStr::from_bytes(&raw))
            .map_err(|source| ResolveError::Query { strategy: self.capability(), source })
    }
}

/// Run the sysctl into `buf` (or probe the size when `buf` is `None`)
fn sysctl_into(buf: Option<&mut [u8]>) -> io::Result<usize> {
    let (ptr, mut len) = match buf {
        Some(buf) => (buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()),
        None => (std::ptr::null_mut(), 0),
    };
    #[allow(clippy::cast_possible_truncation)]
    let rc = unsafe {
        libc::sysctl(
            PATHNAME_MIB.as_ptr(),
            PATHNAME_MIB.len() as libc::c_uint,
            ptr,
            &mut len,
            std::ptr::null(),
            0,
        )
    };
    if rc == 0 {
        Ok(len)
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Path bytes without the trailing NUL
fn query_pathname() -> Result<Vec<u8>, ResolveError> {
    let query_err = |source| ResolveError::Query { strategy: Capability::KernelPathSysctl, source };

    let mut capacity = sysctl_into(None).map_err(query_err)?.max(1);
    for attempt in 1..=MAX_ATTEMPTS {
        let mut buf = vec![0u8; capacity];
        match sysctl_into(Some(&mut buf)) {
            Ok(len) => {
                buf.truncate(len);
                if let Some(nul) = buf.iter().position(|&b| b == 0) {
                    buf.truncate(nul);
                }
                return Ok(buf);
            }
            Err(e) if e.raw_os_error() == Some(libc::ENOMEM) => {
                debug!("sysctl path truncated at {capacity} bytes (attempt {attempt})");
                capacity *= 2;
            }
            Err(e) => return Err(query_err(e)),
        }
    }
    Err(ResolveError::Truncated { strategy: Capability::KernelPathSysctl, attempts: MAX_ATTEMPTS })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysctl_matches_current_exe() {
        let path = SysctlStrategy.locate().unwrap();
        let expected = fs::canonicalize(std::env::current_exe().unwrap()).unwrap();
        assert_eq!(path, expected);
    }
}
