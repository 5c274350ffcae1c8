//! CPU identification

use anyhow::{anyhow, Result};
use ::sysinfo::{Cpu, System};

use super::or_empty;

/// CPU list with brand and vendor filled in
fn cpu_snapshot() -> System {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys
}

/// Trimmed, non-empty `field` of the first logical CPU
fn first_cpu(sys: &System, what: &str, field: impl Fn(&Cpu) -> &str) -> Result<String> {
    sys.cpus()
        .first()
        .map(|cpu| field(cpu).trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("no {what} reported"))
}

/// Processor model name
#[must_use]
pub fn cpu_processor() -> String {
    or_empty("cpu processor", first_cpu(&cpu_snapshot(), "cpu brand", Cpu::brand))
}

/// Processor vendor identifier
#[must_use]
pub fn cpu_vendor() -> String {
    or_empty("cpu vendor", first_cpu(&cpu_snapshot(), "cpu vendor", Cpu::vendor_id))
}

/// Number of physical cores
#[must_use]
pub fn cpu_core_count() -> String {
    let count = System::physical_core_count()
        .filter(|&n| n > 0)
        .ok_or_else(|| anyhow!("no core topology reported"));
    or_empty("cpu core count", count.map(|n| n.to_string()))
}

/// Number of logical processors
#[must_use]
pub fn cpu_processor_count() -> String {
    or_empty("cpu processor count", processor_count(&cpu_snapshot()).map(|n| n.to_string()))
}

fn processor_count(sys: &System) -> Result<usize> {
    match sys.cpus().len() {
        0 => {
            log::debug!("CPU list empty, falling back to available parallelism");
            Ok(std::thread::available_parallelism()?.get())
        }
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_count_self() {
        let count: usize = cpu_processor_count().parse().unwrap();
        assert!(count >= 1);
    }

    #[test]
    fn test_empty_cpu_list_falls_back() {
        let empty = System::new();
        assert!(processor_count(&empty).unwrap() >= 1);
        assert!(first_cpu(&empty, "cpu brand", Cpu::brand).is_err());
    }

    #[test]
    fn test_core_count_is_positive_or_empty() {
        let cores = cpu_core_count();
        assert!(cores.is_empty() || cores.parse::<usize>().unwrap() >= 1);
    }

    #[cfg(any(target_os = "linux", target_os = "macos", windows))]
    #[test]
    fn test_processor_brand_self() {
        assert!(!cpu_processor().is_empty());
    }
}
