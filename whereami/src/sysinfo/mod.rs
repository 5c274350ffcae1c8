//! System metric accessors
//!
//! Single-shot platform queries feeding the system report. Every accessor
//! returns a display string and degrades to an empty string when the
//! platform cannot answer; failures are logged at debug level.

pub mod cpu;
pub mod format;
pub mod gpu;
pub mod memory;
pub mod os;

pub use cpu::{cpu_core_count, cpu_processor, cpu_processor_count, cpu_vendor};
pub use format::format_bytes;
pub use gpu::{gpu_manufacturer, gpu_renderer, memory_totalvram};
pub use memory::{
    memory_freeram, memory_freeswap, memory_totalram, memory_totalswap, memory_usedram,
    memory_usedswap,
};
pub use os::{
    os_architecture, os_device_name, os_kernel_name, os_kernel_release, os_kernel_version,
    os_product_name,
};

/// Value of a query, or an empty string after logging why it failed
fn or_empty(what: &str, result: anyhow::Result<String>) -> String {
    result.unwrap_or_else(|e| {
        log::debug!("{what} unavailable: {e:#}");
        String::new()
    })
}
