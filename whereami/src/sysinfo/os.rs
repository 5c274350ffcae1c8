//! Operating system identification

#![allow(unsafe_code)] // uname() requires unsafe

use anyhow::{bail, Context, Result};
use std::fs;

use super::or_empty;

/// Fields of `uname(2)`
#[derive(Debug, Clone, Default)]
struct Uname {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
}

#[cfg(unix)]
fn uname() -> Result<Uname> {
    fn field(chars: &[libc::c_char]) -> String {
        #[allow(clippy::cast_sign_loss)]
        let bytes: Vec<u8> = chars.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    let mut raw: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut raw) } < 0 {
        return Err(std::io::Error::last_os_error()).context("uname failed");
    }
    Ok(Uname {
        sysname: field(&raw.sysname),
        nodename: field(&raw.nodename),
        release: field(&raw.release),
        version: field(&raw.version),
        machine: field(&raw.machine),
    })
}

/// The same fields from the platform's own APIs
#[cfg(not(unix))]
fn uname() -> Result<Uname> {
    use ::sysinfo::System;

    let name = System::name().context("no system name reported")?;
    Ok(Uname {
        sysname: name,
        nodename: System::host_name().unwrap_or_default(),
        release: System::os_version().unwrap_or_default(),
        version: System::kernel_version().unwrap_or_default(),
        machine: std::env::consts::ARCH.to_string(),
    })
}

fn non_empty(value: String, what: &str) -> Result<String> {
    if value.is_empty() {
        bail!("{what} is empty");
    }
    Ok(value)
}

/// Network name of the machine
#[must_use]
pub fn os_device_name() -> String {
    or_empty("os device name", uname().and_then(|u| non_empty(u.nodename, "nodename")))
}

/// Kernel name, e.g. `Linux`
#[must_use]
pub fn os_kernel_name() -> String {
    or_empty("os kernel name", uname().and_then(|u| non_empty(u.sysname, "sysname")))
}

/// Kernel release, e.g. `6.1.0-arch1-1`
#[must_use]
pub fn os_kernel_release() -> String {
    or_empty("os kernel release", uname().and_then(|u| non_empty(u.release, "release")))
}

/// Kernel build version string
#[must_use]
pub fn os_kernel_version() -> String {
    or_empty("os kernel version", uname().and_then(|u| non_empty(u.version, "version")))
}

/// Hardware architecture, e.g. `x86_64`
#[must_use]
pub fn os_architecture() -> String {
    or_empty("os architecture", uname().and_then(|u| non_empty(u.machine, "machine")))
}

/// Distribution or product name
///
/// `PRETTY_NAME` from `/etc/os-release` where present, then the platform's
/// long OS version, otherwise the kernel name and release.
#[must_use]
pub fn os_product_name() -> String {
    or_empty("os product name", product_name())
}

fn product_name() -> Result<String> {
    if let Some(name) = fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| parse_os_release(&content, "PRETTY_NAME"))
    {
        return Ok(name);
    }
    if let Some(name) = ::sysinfo::System::long_os_version().filter(|n| !n.trim().is_empty()) {
        return Ok(name.trim().to_string());
    }
    let u = uname()?;
    non_empty(format!("{} {}", u.sysname, u.release).trim().to_string(), "product name")
}

/// Value of `key` in `os-release(5)` content, with shell quoting removed
fn parse_os_release(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_os_release() {
        let content = "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n";
        assert_eq!(parse_os_release(content, "PRETTY_NAME").as_deref(), Some("Arch Linux"));
        assert_eq!(parse_os_release(content, "ID").as_deref(), Some("arch"));
        assert_eq!(parse_os_release(content, "VERSION_ID"), None);
    }

    #[test]
    fn test_parse_os_release_empty_value() {
        assert_eq!(parse_os_release("PRETTY_NAME=\"\"\n", "PRETTY_NAME"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_uname_self() {
        assert!(!os_kernel_name().is_empty());
        assert!(!os_architecture().is_empty());
        assert!(!os_product_name().is_empty());
        assert!(!os_kernel_version().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_kernel_name_linux() {
        assert_eq!(os_kernel_name(), "Linux");
    }
}
