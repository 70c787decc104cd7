//! Display constants and human-readable number formatting.
//!
//! Everything a render depends on besides the tracked events lives here, so
//! two renders of the same state produce the same bytes.

use std::time::Duration;

/// Glyphs and widths used by the renderer.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Progress bar glyphs.
    pub bar: BarGlyphs,
    /// Number of glyphs in an interactive progress bar.
    pub bar_width: usize,
    /// Placeholder when a rate cannot be computed yet.
    pub no_rate: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bar: BarGlyphs::default(),
            bar_width: 24,
            no_rate: "-/s",
        }
    }
}

/// Filled and empty cells of a progress bar.
#[derive(Debug, Clone)]
pub struct BarGlyphs {
    /// Completed portion (▓).
    pub filled: &'static str,
    /// Remaining portion (░).
    pub empty: &'static str,
}

impl Default for BarGlyphs {
    fn default() -> Self {
        Self {
            filled: "▓",
            empty: "░",
        }
    }
}

/// Clamp a signed wire counter to an unsigned byte count.
pub fn clamp_bytes(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

const SIZE_UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Byte count in binary units. Counts below 1 KiB stay exact; larger ones
/// get one decimal in the biggest unit that keeps the value at least 1,
/// topping out at GB.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = SIZE_UNITS[0];
    for &next in &SIZE_UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

/// Format throughput. Returns `None` when no time has elapsed yet.
pub fn format_rate(bytes: u64, elapsed: Duration) -> Option<String> {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return None;
    }
    let per_sec = (bytes as f64 / secs).round() as u64;
    Some(format!("{}/s", format_size(per_sec)))
}

/// Format elapsed wall-clock time with one decimal, e.g. `3.2s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    #[test]
    fn test_format_size_small_counts_are_exact() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(KIB - 1), "1023 B");
    }

    #[test]
    fn test_format_size_switches_unit_at_each_boundary() {
        assert_eq!(format_size(KIB), "1.0 KB");
        assert_eq!(format_size(MIB), "1.0 MB");
        assert_eq!(format_size(GIB), "1.0 GB");
        assert_eq!(format_size(3 * MIB / 2), "1.5 MB");
    }

    #[test]
    fn test_format_size_rounds_within_lower_unit() {
        assert_eq!(format_size(MIB - 1), "1024.0 KB");
    }

    #[test]
    fn test_format_size_stays_in_gigabytes() {
        assert_eq!(format_size(2048 * GIB), "2048.0 GB");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(2048, Duration::from_secs(2)).unwrap(), "1.0 KB/s");
        assert_eq!(format_rate(0, Duration::from_secs(1)).unwrap(), "0 B/s");
    }

    #[test]
    fn test_format_rate_without_elapsed_time() {
        assert!(format_rate(4096, Duration::ZERO).is_none());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(3200)), "3.2s");
        assert_eq!(format_elapsed(Duration::ZERO), "0.0s");
    }

    #[test]
    fn test_clamp_bytes() {
        assert_eq!(clamp_bytes(-5), 0);
        assert_eq!(clamp_bytes(42), 42);
    }

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.bar.filled, "▓");
        assert_eq!(theme.bar_width, 24);
    }
}
