//! Relocation changes the process working directory, so it runs in its own
//! test binary.

use std::env;
use std::fs;

use tempfile::TempDir;
use whereami::companion::relocate;
use whereami_common::DIALOG_ENV;

#[test]
fn test_relocate_enters_exe_directory_and_exports_dialog_env() {
    let tmp = TempDir::new().unwrap();
    let exe = tmp.path().join("app");
    fs::write(&exe, "").unwrap();

    relocate(&exe).unwrap();

    assert_eq!(
        fs::canonicalize(env::current_dir().unwrap()).unwrap(),
        fs::canonicalize(tmp.path()).unwrap()
    );
    for (key, value) in DIALOG_ENV {
        assert_eq!(env::var(key).unwrap(), value);
    }
    assert_eq!(env::var("IMGUI_DIALOG_WIDTH").unwrap(), "1024");
    assert_eq!(env::var("IMGUI_FONT_SIZE").unwrap(), "24");

    let missing = tmp.path().join("gone/app");
    assert!(relocate(&missing).is_err());

    #[cfg(target_os = "linux")]
    {
        use std::os::unix::ffi::OsStrExt;

        let dir = tmp.path().join(std::ffi::OsStr::from_bytes(b"rd_\xfc"));
        fs::create_dir(&dir).unwrap();
        relocate(&dir.join("app")).unwrap();
        assert_eq!(
            fs::canonicalize(env::current_dir().unwrap()).unwrap(),
            fs::canonicalize(&dir).unwrap()
        );
    }
}
