//! Display adapter identification through the DRM class in sysfs

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{format_bytes, or_empty};

const DRM_CLASS: &str = "/sys/class/drm";

/// Device directory of the first DRM card (`cardN`, not its connectors)
fn first_card() -> Result<PathBuf> {
    let entries = fs::read_dir(DRM_CLASS).with_context(|| format!("Failed to read {DRM_CLASS}"))?;
    let mut cards: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("card") && !name.contains('-'))
        .collect();
    cards.sort();
    cards
        .first()
        .map(|card| Path::new(DRM_CLASS).join(card).join("device"))
        .ok_or_else(|| anyhow!("no DRM card under {DRM_CLASS}"))
}

fn read_trimmed(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .trim()
        .to_string())
}

/// Vendor name for a PCI vendor id such as `0x10de`
fn vendor_name(id: &str) -> String {
    match id.trim().to_ascii_lowercase().trim_start_matches("0x") {
        "10de" => "NVIDIA Corporation".to_string(),
        "1002" | "1022" => "Advanced Micro Devices, Inc.".to_string(),
        "8086" => "Intel Corporation".to_string(),
        "1af4" => "Red Hat, Inc.".to_string(),
        "15ad" => "VMware".to_string(),
        "1234" => "QEMU".to_string(),
        "5143" => "Qualcomm".to_string(),
        "13b5" => "ARM".to_string(),
        other => format!("0x{other}"),
    }
}

/// `DRIVER=` value of a `uevent` file
fn uevent_driver(uevent: &str) -> Option<String> {
    uevent
        .lines()
        .find_map(|line| line.strip_prefix("DRIVER="))
        .map(str::to_string)
        .filter(|d| !d.is_empty())
}

/// Manufacturer of the primary display adapter
#[must_use]
pub fn gpu_manufacturer() -> String {
    or_empty(
        "gpu manufacturer",
        first_card().and_then(|dev| read_trimmed(&dev.join("vendor"))).map(|id| vendor_name(&id)),
    )
}

/// Kernel driver bound to the primary display adapter
#[must_use]
pub fn gpu_renderer() -> String {
    or_empty(
        "gpu renderer",
        first_card().and_then(|dev| {
            let uevent = read_trimmed(&dev.join("uevent"))?;
            uevent_driver(&uevent).ok_or_else(|| anyhow!("no DRIVER in uevent"))
        }),
    )
}

/// Dedicated video memory, where the driver reports it
#[must_use]
pub fn memory_totalvram(human_readable: bool) -> String {
    or_empty(
        "gpu memory",
        first_card().and_then(|dev| {
            let bytes: u64 = read_trimmed(&dev.join("mem_info_vram_total"))?
                .parse()
                .context("Invalid mem_info_vram_total")?;
            Ok(format_bytes(bytes, human_readable))
        }),
    )
}
