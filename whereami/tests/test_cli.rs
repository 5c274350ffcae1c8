use std::fs;
use std::path::PathBuf;
use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_whereami");

fn bin_path() -> PathBuf {
    fs::canonicalize(BIN).unwrap()
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(BIN).args(args).env_remove("RUST_LOG").output().expect("Failed to run whereami")
}

#[test]
fn test_print_path_matches_binary() {
    let output = run(&["--print-path"]);
    assert!(output.status.success());
    let printed = String::from_utf8(output.stdout).unwrap();
    let printed = PathBuf::from(printed.trim_end());
    assert!(printed.is_absolute());
    assert_eq!(fs::canonicalize(printed).unwrap(), bin_path());
}

#[cfg(any(target_os = "linux", target_os = "openbsd"))]
#[test]
fn test_argv0_strategy_matches_native() {
    let output = run(&["--strategy", "argv0", "--print-path"]);
    assert!(output.status.success());
    let printed = String::from_utf8(output.stdout).unwrap();
    assert_eq!(PathBuf::from(printed.trim_end()), bin_path());
}

#[cfg(target_os = "linux")]
#[test]
fn test_argv0_strategy_from_non_utf8_directory() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::process::CommandExt;

    let tmp = tempfile::Builder::new().tempdir_in(env!("CARGO_TARGET_TMPDIR")).unwrap();
    let dir = tmp.path().join(OsStr::from_bytes(b"pd_\xff"));
    fs::create_dir(&dir).unwrap();
    let copy = dir.join("whereami");
    fs::copy(BIN, &copy).unwrap();

    let output = Command::new(&copy)
        .arg0("whereami")
        .args(["--strategy", "argv0", "--print-path"])
        .env("PATH", &dir)
        .env_remove("_")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run copied whereami");

    assert!(output.status.success());
    let printed = output.stdout.strip_suffix(b"\n").unwrap();
    assert_eq!(printed, fs::canonicalize(&copy).unwrap().as_os_str().as_bytes());
}

#[test]
fn test_json_report_is_valid() {
    let output = run(&["--json", "--no-dialog"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    let fields = parsed.as_object().unwrap();
    assert_eq!(fields.len(), 19);
    assert!(fields.values().all(serde_json::Value::is_string));
    assert!(fields.contains_key("os_kernel_name"));
}

#[test]
fn test_text_report_lists_every_row() {
    let output = run(&["--no-dialog", "--raw-bytes"]);
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(text.lines().count(), 19);
    assert!(text.starts_with("OS DEVICE NAME: "));
    assert!(text.lines().any(|line| line.starts_with("OS KERNEL VERSION: ")));
}

#[test]
fn test_quiet_prints_nothing() {
    let output = run(&["--quiet", "--no-dialog"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_strategy_is_usage_error() {
    let output = run(&["--strategy", "guess"]);
    assert_eq!(output.status.code(), Some(2));
}
