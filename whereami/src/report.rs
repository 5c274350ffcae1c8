//! System report assembled from the metric accessors

use serde::Serialize;

use crate::sysinfo;

/// Snapshot of the system metrics, in report order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemReport {
    pub os_device_name: String,
    pub os_product_name: String,
    pub os_kernel_name: String,
    pub os_kernel_release: String,
    pub os_kernel_version: String,
    pub os_architecture: String,
    pub cpu_processor: String,
    pub cpu_vendor: String,
    pub cpu_core_count: String,
    pub cpu_processor_count: String,
    pub memory_total_ram: String,
    pub memory_used_ram: String,
    pub memory_free_ram: String,
    pub memory_total_swap: String,
    pub memory_used_swap: String,
    pub memory_free_swap: String,
    pub gpu_manufacturer: String,
    pub gpu_renderer: String,
    pub gpu_memory: String,
}

impl SystemReport {
    /// Query every accessor once
    #[must_use]
    pub fn collect(human_readable: bool) -> Self {
        Self {
            os_device_name: sysinfo::os_device_name(),
            os_product_name: sysinfo::os_product_name(),
            os_kernel_name: sysinfo::os_kernel_name(),
            os_kernel_release: sysinfo::os_kernel_release(),
            os_kernel_version: sysinfo::os_kernel_version(),
            os_architecture: sysinfo::os_architecture(),
            cpu_processor: sysinfo::cpu_processor(),
            cpu_vendor: sysinfo::cpu_vendor(),
            cpu_core_count: sysinfo::cpu_core_count(),
            cpu_processor_count: sysinfo::cpu_processor_count(),
            memory_total_ram: sysinfo::memory_totalram(human_readable),
            memory_used_ram: sysinfo::memory_usedram(human_readable),
            memory_free_ram: sysinfo::memory_freeram(human_readable),
            memory_total_swap: sysinfo::memory_totalswap(human_readable),
            memory_used_swap: sysinfo::memory_usedswap(human_readable),
            memory_free_swap: sysinfo::memory_freeswap(human_readable),
            gpu_manufacturer: sysinfo::gpu_manufacturer(),
            gpu_renderer: sysinfo::gpu_renderer(),
            gpu_memory: sysinfo::memory_totalvram(human_readable),
        }
    }

    /// Labelled rows in display order
    #[must_use]
    pub fn rows(&self) -> [(&'static str, &str); 19] {
        [
            ("OS DEVICE NAME", self.os_device_name.as_str()),
            ("OS PRODUCT NAME", self.os_product_name.as_str()),
            ("OS KERNEL NAME", self.os_kernel_name.as_str()),
            ("OS KERNEL RELEASE", self.os_kernel_release.as_str()),
            ("OS KERNEL VERSION", self.os_kernel_version.as_str()),
            ("OS ARCHITECTURE", self.os_architecture.as_str()),
            ("CPU PROCESSOR", self.cpu_processor.as_str()),
            ("CPU VENDOR", self.cpu_vendor.as_str()),
            ("CPU CORE COUNT", self.cpu_core_count.as_str()),
            ("CPU PROCESSOR COUNT", self.cpu_processor_count.as_str()),
            ("RANDOM-ACCESS MEMORY TOTAL", self.memory_total_ram.as_str()),
            ("RANDOM-ACCESS MEMORY USED", self.memory_used_ram.as_str()),
            ("RANDOM-ACCESS MEMORY FREE", self.memory_free_ram.as_str()),
            ("SWAP MEMORY TOTAL", self.memory_total_swap.as_str()),
            ("SWAP MEMORY USED", self.memory_used_swap.as_str()),
            ("SWAP MEMORY FREE", self.memory_free_swap.as_str()),
            ("GPU MANUFACTURER", self.gpu_manufacturer.as_str()),
            ("GPU RENDERER", self.gpu_renderer.as_str()),
            ("GPU MEMORY", self.gpu_memory.as_str()),
        ]
    }

    /// `LABEL: value` lines joined by newlines, no trailing newline
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows()
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Propagates serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SystemReport {
        SystemReport {
            os_device_name: "host".to_string(),
            os_kernel_version: "#1 SMP PREEMPT_DYNAMIC".to_string(),
            cpu_processor: "Model \"X\"".to_string(),
            gpu_memory: "8.00 GB".to_string(),
            ..SystemReport::default()
        }
    }

    #[test]
    fn test_text_layout() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 19);
        assert_eq!(lines[0], "OS DEVICE NAME: host");
        assert_eq!(lines[4], "OS KERNEL VERSION: #1 SMP PREEMPT_DYNAMIC");
        assert_eq!(lines[6], "CPU PROCESSOR: Model \"X\"");
        assert_eq!(lines[18], "GPU MEMORY: 8.00 GB");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_empty_values_keep_their_rows() {
        let text = SystemReport::default().to_text();
        assert_eq!(text.lines().count(), 19);
        assert!(text.lines().all(|line| line.ends_with(": ")));
    }

    #[test]
    fn test_json_fields() {
        let json = sample().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["os_device_name"], "host");
        assert_eq!(parsed["gpu_memory"], "8.00 GB");
        assert_eq!(parsed["os_kernel_version"], "#1 SMP PREEMPT_DYNAMIC");
        assert_eq!(parsed.as_object().unwrap().len(), 19);
    }
}
