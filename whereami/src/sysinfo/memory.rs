//! RAM and swap totals

use ::sysinfo::System;
use anyhow::{bail, Result};

use super::{format_bytes, or_empty};

/// Memory counters in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemInfo {
    total_ram: u64,
    free_ram: u64,
    total_swap: u64,
    free_swap: u64,
}

impl MemInfo {
    fn read() -> Result<Self> {
        let mut sys = System::new();
        sys.refresh_memory();
        Self::from_system(&sys)
    }

    /// Counters of a refreshed `System`
    ///
    /// Free RAM is the available figure, so reclaimable caches count as
    /// free. A zero RAM total means the platform reported nothing.
    fn from_system(sys: &System) -> Result<Self> {
        if sys.total_memory() == 0 {
            bail!("no memory counters reported");
        }
        Ok(Self {
            total_ram: sys.total_memory(),
            free_ram: sys.available_memory(),
            total_swap: sys.total_swap(),
            free_swap: sys.free_swap(),
        })
    }

    fn used_ram(&self) -> u64 {
        self.total_ram.saturating_sub(self.free_ram)
    }

    fn used_swap(&self) -> u64 {
        self.total_swap.saturating_sub(self.free_swap)
    }
}

fn render(what: &str, pick: impl Fn(&MemInfo) -> u64, human_readable: bool) -> String {
    or_empty(what, MemInfo::read().map(|info| format_bytes(pick(&info), human_readable)))
}

/// Installed RAM
#[must_use]
pub fn memory_totalram(human_readable: bool) -> String {
    render("total ram", |m| m.total_ram, human_readable)
}

/// RAM available to new allocations
#[must_use]
pub fn memory_freeram(human_readable: bool) -> String {
    render("free ram", |m| m.free_ram, human_readable)
}

/// RAM in use (total minus free)
#[must_use]
pub fn memory_usedram(human_readable: bool) -> String {
    render("used ram", MemInfo::used_ram, human_readable)
}

/// Configured swap
#[must_use]
pub fn memory_totalswap(human_readable: bool) -> String {
    render("total swap", |m| m.total_swap, human_readable)
}

/// Unused swap
#[must_use]
pub fn memory_freeswap(human_readable: bool) -> String {
    render("free swap", |m| m.free_swap, human_readable)
}

/// Swap in use (total minus free)
#[must_use]
pub fn memory_usedswap(human_readable: bool) -> String {
    render("used swap", MemInfo::used_swap, human_readable)
}
