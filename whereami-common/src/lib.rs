//! # Shared Data Structures (Kernel ↔ Userspace)
//!
//! Defines the kernel ABI records and fixed constants used by the `whereami`
//! resolver and its entry point. Records crossing the kernel boundary use
//! `#[repr(C)]` so the layout matches what the kernel copies out.
//!
//! ## Key Types
//!
//! - [`FileIdentity`] - Device + inode pair naming one file on one filesystem
//! - [`KinfoFile`] - Prefix of OpenBSD's `struct kinfo_file` (open-file table entry)
//!
//! ## Key Constants
//!
//! - [`DEFAULT_SEARCH_PATH`] - Search list used when `PATH` yields no match
//! - [`COMPANION_NAME`] / [`SHOW_MESSAGE_FLAG`] - Companion dialog program contract
//! - [`DIALOG_ENV`] - Environment handed to the companion dialog

#![no_std]

use core::fmt;

// ============================================================================
// File Identity
// ============================================================================

/// Identity of a file at a point in time: `(st_dev, st_ino)`
///
/// Two identities are equal iff both components match. Paths are not part of
/// the identity, so hard links and symlinks to the same file compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub device: u64,
    pub inode: u64,
}

impl FileIdentity {
    #[must_use]
    pub const fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev:{} ino:{}", self.device, self.inode)
    }
}

// ============================================================================
// Resolution Constants
// ============================================================================

/// **Argv0 Chain**: Search list tried once after `PATH` is exhausted
///
/// Prefixed with `$HOME/bin` when `HOME` is set.
pub const DEFAULT_SEARCH_PATH: &str =
    "/usr/bin:/bin:/usr/sbin:/sbin:/usr/X11R6/bin:/usr/local/bin:/usr/local/sbin";

/// Separator between entries of `PATH` and [`DEFAULT_SEARCH_PATH`]
pub const SEARCH_PATH_SEPARATOR: u8 = b':';

/// Environment variables consulted by the argv0 chain (read-only)
pub const ENV_PATH: &str = "PATH";
pub const ENV_HOME: &str = "HOME";
pub const ENV_PWD: &str = "PWD";
/// The shell's record of the last executed command
pub const ENV_UNDERSCORE: &str = "_";

// ============================================================================
// Companion Dialog Contract
// ============================================================================

/// Companion dialog executable, looked up next to the resolved executable
#[cfg(windows)]
pub const COMPANION_NAME: &str = "filedialogs.exe";
#[cfg(not(windows))]
pub const COMPANION_NAME: &str = "filedialogs";

/// Argument introducing the message the companion displays
pub const SHOW_MESSAGE_FLAG: &str = "--show-message";

/// Environment set for the companion after successful resolution
pub const DIALOG_ENV: [(&str, &str); 2] = [("IMGUI_DIALOG_WIDTH", "1024"), ("IMGUI_FONT_SIZE", "24")];

// ============================================================================
// OpenBSD Open-File Table
// ============================================================================

/// `KERN_FILE_BYPID`: select open files of a single process
pub const KERN_FILE_BYPID: i32 = 2;

/// `KERN_FILE_TEXT`: pseudo descriptor for the process text (executable) vnode
///
/// Pseudo descriptors are negative and are listed before real descriptors.
pub const KERN_FILE_TEXT: i32 = -1;

/// `KVM_NO_FILES`: open a kvm handle without kernel image or core files
#[allow(clippy::cast_possible_wrap)]
pub const KVM_NO_FILES: i32 = 0x8000_0000_u32 as i32;

/// `KI_MNAMELEN`: mount point name length in [`KinfoFile`]
pub const KI_MNAMELEN: usize = 96;

/// `KI_MAXCOMLEN`: command name length in [`KinfoFile`]
pub const KI_MAXCOMLEN: usize = 24;

/// Leading fields of OpenBSD's `struct kinfo_file`, through `p_comm`
///
/// The kernel copies `min(esize, sizeof(struct kinfo_file))` bytes per entry
/// and strides by `esize`, so requesting entries of this size yields a valid
/// array of prefixes.
///
/// **Memory Layout**: `#[repr(C)]`, 424 bytes, all fields naturally aligned
#[repr(C)]
#[derive(Clone, Copy)]
pub struct KinfoFile {
    pub f_fileaddr: u64,
    pub f_flag: u32,
    pub f_iflags: u32,
    pub f_type: u32,
    pub f_count: u32,
    pub f_msgcount: u32,
    pub f_usecount: u32,
    pub f_ucred: u64,
    pub f_uid: u32,
    pub f_gid: u32,
    pub f_ops: u64,
    pub f_offset: u64,
    pub f_data: u64,
    pub f_rxfer: u64,
    pub f_rwfer: u64,
    pub f_seek: u64,
    pub f_rbytes: u64,
    pub f_wbytes: u64,

    // ========================================================================
    // Vnode
    // ========================================================================
    pub v_un: u64,
    pub v_type: u32,
    pub v_tag: u32,
    pub v_flag: u32,
    pub va_rdev: u32,
    pub v_data: u64,
    pub v_mount: u64,
    /// Inode number of the vnode
    pub va_fileid: u64,
    pub va_size: u64,
    pub va_mode: u32,
    /// Filesystem device of the vnode (`dev_t`)
    pub va_fsid: u32,
    pub f_mntonname: [u8; KI_MNAMELEN],

    // ========================================================================
    // Socket / Pipe / Kqueue
    // ========================================================================
    pub so_type: u32,
    pub so_state: u32,
    pub so_pcb: u64,
    pub so_protocol: u32,
    pub so_family: u32,
    pub inp_ppcb: u64,
    pub inp_lport: u32,
    pub inp_laddru: [u32; 4],
    pub inp_fport: u32,
    pub inp_faddru: [u32; 4],
    pub unp_conn: u64,
    pub pipe_peer: u64,
    pub pipe_state: u32,
    pub kq_count: u32,
    pub kq_state: u32,
    pub unused1: u32,

    // ========================================================================
    // Owning Process (KERN_FILE_BYPID)
    // ========================================================================
    pub p_pid: u32,
    /// Descriptor number; negative for pseudo descriptors such as [`KERN_FILE_TEXT`]
    pub fd_fd: i32,
    pub fd_ofileflags: u32,
    pub p_uid: u32,
    pub p_gid: u32,
    pub p_tid: u32,
    /// Kernel command name, NUL-terminated
    pub p_comm: [u8; KI_MAXCOMLEN],
}

impl KinfoFile {
    /// Is this the process text (executable) entry?
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.fd_fd == KERN_FILE_TEXT
    }

    /// Command name bytes up to the first NUL
    #[must_use]
    pub fn comm(&self) -> &[u8] {
        let end = self.p_comm.iter().position(|&b| b == 0).unwrap_or(KI_MAXCOMLEN);
        &self.p_comm[..end]
    }

    /// File identity of the vnode, with `va_fsid` widened the way `st_dev` is
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn identity(&self) -> FileIdentity {
        FileIdentity::new(self.va_fsid as i32 as u64, self.va_fileid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> KinfoFile {
        KinfoFile {
            f_fileaddr: 0,
            f_flag: 0,
            f_iflags: 0,
            f_type: 0,
            f_count: 0,
            f_msgcount: 0,
            f_usecount: 0,
            f_ucred: 0,
            f_uid: 0,
            f_gid: 0,
            f_ops: 0,
            f_offset: 0,
            f_data: 0,
            f_rxfer: 0,
            f_rwfer: 0,
            f_seek: 0,
            f_rbytes: 0,
            f_wbytes: 0,
            v_un: 0,
            v_type: 0,
            v_tag: 0,
            v_flag: 0,
            va_rdev: 0,
            v_data: 0,
            v_mount: 0,
            va_fileid: 0,
            va_size: 0,
            va_mode: 0,
            va_fsid: 0,
            f_mntonname: [0; KI_MNAMELEN],
            so_type: 0,
            so_state: 0,
            so_pcb: 0,
            so_protocol: 0,
            so_family: 0,
            inp_ppcb: 0,
            inp_lport: 0,
            inp_laddru: [0; 4],
            inp_fport: 0,
            inp_faddru: [0; 4],
            unp_conn: 0,
            pipe_peer: 0,
            pipe_state: 0,
            kq_count: 0,
            kq_state: 0,
            unused1: 0,
            p_pid: 0,
            fd_fd: 0,
            fd_ofileflags: 0,
            p_uid: 0,
            p_gid: 0,
            p_tid: 0,
            p_comm: [0; KI_MAXCOMLEN],
        }
    }

    #[test]
    fn test_kinfo_file_layout() {
        assert_eq!(core::mem::size_of::<KinfoFile>(), 424);
        assert_eq!(core::mem::align_of::<KinfoFile>(), 8);
    }

    #[test]
    fn test_comm_stops_at_nul() {
        let mut kf = blank();
        kf.p_comm[..5].copy_from_slice(b"shell");
        assert_eq!(kf.comm(), b"shell");
    }

    #[test]
    fn test_text_entry_identity() {
        let mut kf = blank();
        kf.fd_fd = KERN_FILE_TEXT;
        kf.va_fsid = 4;
        kf.va_fileid = 1234;
        assert!(kf.is_text());
        assert_eq!(kf.identity(), FileIdentity::new(4, 1234));
    }

    #[test]
    fn test_file_identity_equality() {
        assert_eq!(FileIdentity::new(1, 2), FileIdentity::new(1, 2));
        assert_ne!(FileIdentity::new(1, 2), FileIdentity::new(1, 3));
        assert_ne!(FileIdentity::new(1, 2), FileIdentity::new(2, 2));
    }
}
