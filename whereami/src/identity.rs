//! Candidate verification against the kernel's record of the executable.
//!
//! A candidate path only counts as the running executable when it is a
//! regular file with the owner execute bit set and its `(st_dev, st_ino)`
//! equals the identity the kernel reports for the process text. Matching by
//! name alone would accept a shadowed or planted file of the same name.

use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use log::trace;

use crate::domain::{FileIdentity, TextImage};
use crate::paths::directory_of_bytes;

/// `S_IXUSR`
const OWNER_EXECUTE: u32 = 0o100;

/// Identity of the file described by `meta`
#[must_use]
pub fn identity_of(meta: &Metadata) -> FileIdentity {
    FileIdentity::new(meta.dev(), meta.ino())
}

/// Identity of the file at `path`, following symlinks
///
/// # Errors
/// Returns the `stat` error when the path cannot be inspected.
pub fn identity_of_path(path: impl AsRef<Path>) -> std::io::Result<FileIdentity> {
    fs::metadata(path).map(|meta| identity_of(&meta))
}

/// Canonical path of `candidate` if it is the file named by `expected`
///
/// Any I/O failure (missing file, permission denied, dangling link) is a
/// plain "no match".
#[must_use]
pub fn verify_identity(candidate: &Path, expected: &FileIdentity) -> Option<PathBuf> {
    let meta = fs::metadata(candidate).ok()?;
    if !meta.is_file() || meta.permissions().mode() & OWNER_EXECUTE == 0 {
        return None;
    }
    if identity_of(&meta) != *expected {
        trace!("{} is {}, expected {}", candidate.display(), identity_of(&meta), expected);
        return None;
    }
    fs::canonicalize(candidate).ok()
}

/// Verifies candidates against one [`TextImage`]
#[derive(Debug, Clone, Copy)]
pub struct Verifier<'a> {
    image: &'a TextImage,
}

impl<'a> Verifier<'a> {
    #[must_use]
    pub fn new(image: &'a TextImage) -> Self {
        Self { image }
    }

    /// Verify `candidate`, then once more with its file name replaced by the
    /// kernel command name
    ///
    /// The second check finds a binary started through a differently named
    /// link living in the same directory.
    #[must_use]
    pub fn verify(&self, candidate: &Path) -> Option<PathBuf> {
        if let Some(path) = verify_identity(candidate, &self.image.identity) {
            return Some(path);
        }

        let comm = self.image.comm.as_deref()?;
        let bytes = candidate.as_os_str().as_bytes();
        if !bytes.contains(&b'/') {
            return None;
        }
        let sibling = [directory_of_bytes(bytes), comm.as_bytes()].concat();
        if sibling == bytes {
            return None;
        }
        verify_identity(Path::new(OsStr::from_bytes(&sibling)), &self.image.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn executable(dir: &TempDir, name: &str, mode: u32) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_verify_identity_match() {
        let dir = TempDir::new().unwrap();
        let exe = executable(&dir, "app", 0o755);
        let expected = identity_of_path(&exe).unwrap();

        let verified = verify_identity(&exe, &expected);
        assert_eq!(verified, Some(fs::canonicalize(&exe).unwrap()));
    }

    #[test]
    fn test_verify_identity_rejects_same_name_other_file() {
        let dir = TempDir::new().unwrap();
        let real = executable(&dir, "app", 0o755);
        let other = TempDir::new().unwrap();
        let impostor = executable(&other, "app", 0o755);
        let expected = identity_of_path(&real).unwrap();

        assert_eq!(verify_identity(&impostor, &expected), None);
    }

    #[test]
    fn test_verify_identity_requires_execute_bit() {
        let dir = TempDir::new().unwrap();
        let exe = executable(&dir, "app", 0o644);
        let expected = identity_of_path(&exe).unwrap();

        assert_eq!(verify_identity(&exe, &expected), None);
    }

    #[test]
    fn test_verify_identity_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let expected = identity_of_path(dir.path()).unwrap();

        assert_eq!(verify_identity(dir.path(), &expected), None);
    }

    #[test]
    fn test_verify_identity_missing_file_is_no_match() {
        let expected = FileIdentity::new(0, 0);
        assert_eq!(verify_identity(Path::new("/nonexistent/path/to/app"), &expected), None);
    }

    #[test]
    fn test_verify_identity_through_symlink() {
        let dir = TempDir::new().unwrap();
        let exe = executable(&dir, "app", 0o755);
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&exe, &link).unwrap();
        let expected = identity_of_path(&exe).unwrap();

        assert_eq!(verify_identity(&link, &expected), Some(fs::canonicalize(&exe).unwrap()));
    }

    #[test]
    fn test_verifier_falls_back_to_comm_sibling() {
        let dir = TempDir::new().unwrap();
        let exe = executable(&dir, "real-app", 0o755);
        let image = TextImage::new(identity_of_path(&exe).unwrap()).with_comm("real-app");
        let verifier = Verifier::new(&image);

        let renamed = dir.path().join("renamed");
        assert_eq!(verifier.verify(&renamed), Some(fs::canonicalize(&exe).unwrap()));
    }

    #[test]
    fn test_verifier_without_comm_rejects() {
        let dir = TempDir::new().unwrap();
        let exe = executable(&dir, "real-app", 0o755);
        let image = TextImage::new(identity_of_path(&exe).unwrap());
        let verifier = Verifier::new(&image);

        let renamed = dir.path().join("renamed");
        assert_eq!(verifier.verify(&renamed), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_verifier_comm_sibling_in_non_utf8_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(OsStr::from_bytes(b"pd_\xff"));
        fs::create_dir(&dir).unwrap();
        let exe = dir.join("real-app");
        File::create(&exe).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        let image = TextImage::new(identity_of_path(&exe).unwrap()).with_comm("real-app");

        let verified = Verifier::new(&image).verify(&dir.join("renamed"));
        assert_eq!(verified, Some(fs::canonicalize(&exe).unwrap()));
    }
}
