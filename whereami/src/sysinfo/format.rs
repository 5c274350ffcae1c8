//! Byte count formatting

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Render a byte count, scaled to a binary unit when `human_readable`
///
/// Scaled values carry two decimals (`1.50 GB`); plain byte counts and
/// values below 1 KB are printed as integers.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64, human_readable: bool) -> String {
    if !human_readable {
        return bytes.to_string();
    }
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bytes() {
        assert_eq!(format_bytes(1_073_741_824, false), "1073741824");
        assert_eq!(format_bytes(0, false), "0");
    }

    #[test]
    fn test_human_readable() {
        assert_eq!(format_bytes(512, true), "512 B");
        assert_eq!(format_bytes(1536, true), "1.50 KB");
        assert_eq!(format_bytes(16 * 1024 * 1024 * 1024, true), "16.00 GB");
    }

    #[test]
    fn test_largest_unit_caps() {
        assert_eq!(format_bytes(u64::MAX, true), "16384.00 PB");
    }
}
