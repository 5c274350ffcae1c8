//! Kernel record of the process text segment
//!
//! The argv0 chain needs the identity of the file the kernel actually
//! executed, independent of any candidate path. OpenBSD reports it as the
//! `KERN_FILE_TEXT` entry of the process's open-file table; Linux exposes it
//! through `/proc/<pid>/exe`.

use crate::domain::{Pid, ResolveError, TextImage};

fn unavailable(pid: Pid, reason: impl Into<String>) -> ResolveError {
    ResolveError::TextImageUnavailable { pid, reason: reason.into() }
}

/// Query the kernel for the executable identity of `pid`
///
/// # Errors
/// Returns [`ResolveError::TextImageUnavailable`] when the kernel query cannot
/// be made or reports no text entry.
#[cfg(target_os = "linux")]
pub fn query_text_image(pid: Pid) -> Result<TextImage, ResolveError> {
    use crate::identity::identity_of_path;
    use std::ffi::OsStr;
    use std::fs;
    use std::os::unix::ffi::OsStrExt;

    let exe_link = format!("/proc/{}/exe", pid.0);
    let identity =
        identity_of_path(&exe_link).map_err(|e| unavailable(pid, format!("{exe_link}: {e}")))?;

    let stat_path = format!("/proc/{}/stat", pid.0);
    let stat = fs::read(stat_path).unwrap_or_default();

    let image = TextImage::new(identity);
    Ok(match extract_comm(&stat) {
        Some(comm) => image.with_comm(OsStr::from_bytes(comm)),
        None => image,
    })
}

/// Query the kernel for the executable identity of `pid`
///
/// # Errors
/// Returns [`ResolveError::TextImageUnavailable`] when no kvm session can be
/// opened or the open-file table has no text entry.
#[cfg(target_os = "openbsd")]
pub fn query_text_image(pid: Pid) -> Result<TextImage, ResolveError> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let session = kvm::KvmSession::open().map_err(|reason| unavailable(pid, reason))?;
    let files = session
        .files_by_pid(pid.into())
        .ok_or_else(|| unavailable(pid, "kvm_getfiles failed"))?;

    // Pseudo descriptors (text, cwd, root, trace) come first.
    let text = files
        .iter()
        .take_while(|f| f.fd_fd < 0)
        .find(|f| f.is_text())
        .ok_or_else(|| unavailable(pid, "no text entry in open-file table"))?;

    Ok(TextImage::new(text.identity()).with_comm(OsStr::from_bytes(text.comm())))
}

/// Query the kernel for the executable identity of `pid`
///
/// # Errors
/// Always: this platform offers no open-file table query.
#[cfg(not(any(target_os = "linux", target_os = "openbsd")))]
pub fn query_text_image(pid: Pid) -> Result<TextImage, ResolveError> {
    Err(unavailable(pid, "no open-file table query on this platform"))
}

/// Extract command name from `/proc/<pid>/stat`.
/// Format: "pid (comm) state ..."
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn extract_comm(stat_line: &[u8]) -> Option<&[u8]> {
    let open = stat_line.iter().position(|&b| b == b'(')?;
    let close = stat_line.iter().rposition(|&b| b == b')')?;
    if open >= close {
        return None;
    }
    Some(&stat_line[open + 1..close])
}

#[cfg(target_os = "openbsd")]
mod kvm {
    #![allow(unsafe_code)] // libkvm is a C API

    use std::ffi::CStr;
    use std::os::raw::{c_char, c_int};
    use std::ptr::{self, NonNull};

    use whereami_common::{KinfoFile, KERN_FILE_BYPID, KVM_NO_FILES};

    /// `_POSIX2_LINE_MAX`
    const ERRBUF_LEN: usize = 2048;

    #[repr(C)]
    struct Kvm {
        _opaque: [u8; 0],
    }

    #[link(name = "kvm")]
    extern "C" {
        fn kvm_openfiles(
            execfile: *const c_char,
            corefile: *const c_char,
            swapfile: *const c_char,
            flags: c_int,
            errbuf: *mut c_char,
        ) -> *mut Kvm;
        fn kvm_getfiles(
            kd: *mut Kvm,
            op: c_int,
            arg: c_int,
            esize: usize,
            cnt: *mut c_int,
        ) -> *mut KinfoFile;
        fn kvm_close(kd: *mut Kvm) -> c_int;
    }

    /// An open kvm handle, closed on drop
    pub struct KvmSession {
        kd: NonNull<Kvm>,
    }

    impl KvmSession {
        pub fn open() -> Result<Self, String> {
            let mut errbuf: [c_char; ERRBUF_LEN] = [0; ERRBUF_LEN];
            let kd = unsafe {
                kvm_openfiles(ptr::null(), ptr::null(), ptr::null(), KVM_NO_FILES, errbuf.as_mut_ptr())
            };
            NonNull::new(kd).map(|kd| Self { kd }).ok_or_else(|| {
                let msg = unsafe { CStr::from_ptr(errbuf.as_ptr()) };
                format!("kvm_openfiles: {}", msg.to_string_lossy())
            })
        }

        /// Open-file table of `pid`; valid until the session is dropped
        pub fn files_by_pid(&self, pid: i32) -> Option<&[KinfoFile]> {
            let mut count: c_int = 0;
            let files = unsafe {
                kvm_getfiles(
                    self.kd.as_ptr(),
                    KERN_FILE_BYPID,
                    pid,
                    std::mem::size_of::<KinfoFile>(),
                    &mut count,
                )
            };
            if files.is_null() {
                return None;
            }
            let len = usize::try_from(count).ok()?;
            Some(unsafe { std::slice::from_raw_parts(files, len) })
        }
    }

    impl Drop for KvmSession {
        fn drop(&mut self) {
            unsafe {
                kvm_close(self.kd.as_ptr());
            }
        }
    }
}
