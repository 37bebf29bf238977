//! Human-readable number, byte, and time formatting helpers.

use chrono::{DateTime, Local};

/// Format a count into a compact string (e.g., "1.2k", "3.4M").
pub fn fmt_count(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Format bytes into a compact human-readable string (e.g., "245M", "1.2G").
pub fn fmt_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}G", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{}M", bytes / 1_000_000)
    } else if bytes >= 1_000 {
        format!("{}K", bytes / 1_000)
    } else {
        format!("{bytes}B")
    }
}

/// Format a byte rate as "245 KB/s".
pub fn fmt_rate(bytes_per_sec: f64) -> String {
    let bps = bytes_per_sec.max(0.0);
    if bps >= 1_000_000_000.0 {
        format!("{:.1} GB/s", bps / 1_000_000_000.0)
    } else if bps >= 1_000_000.0 {
        format!("{:.1} MB/s", bps / 1_000_000.0)
    } else if bps >= 1_000.0 {
        format!("{:.1} KB/s", bps / 1_000.0)
    } else {
        format!("{bps:.0} B/s")
    }
}

/// Format a latency in milliseconds.
pub fn fmt_latency(ms: f64) -> String {
    if ms >= 1_000.0 {
        format!("{:.2}s", ms / 1_000.0)
    } else {
        format!("{ms:.0}ms")
    }
}

/// Format a 0..1 fraction as a percentage.
pub fn fmt_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction.clamp(0.0, 1.0) * 100.0)
}

/// Anomaly timestamps arrive either as epoch seconds or, from older
/// detector builds, as small relative offsets. Epoch-like values render
/// as wall-clock time, the rest as an age.
pub fn fmt_anomaly_time(timestamp: u64) -> String {
    // Anything past 2001-09-09 is clearly an epoch, not an offset.
    const EPOCH_CUTOFF: u64 = 1_000_000_000;

    if timestamp >= EPOCH_CUTOFF {
        i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map_or_else(
                || format!("@{timestamp}"),
                |dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
            )
    } else {
        format!("{timestamp}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_scale_by_magnitude() {
        assert_eq!(fmt_count(950), "950");
        assert_eq!(fmt_count(12_500), "12.5k");
        assert_eq!(fmt_count(3_400_000), "3.4M");
    }

    #[test]
    fn byte_rates_pick_a_unit() {
        assert_eq!(fmt_rate(512.0), "512 B/s");
        assert_eq!(fmt_rate(245_000.0), "245.0 KB/s");
        assert_eq!(fmt_rate(1_500_000.0), "1.5 MB/s");
        assert_eq!(fmt_rate(-10.0), "0 B/s");
    }

    #[test]
    fn latency_switches_to_seconds() {
        assert_eq!(fmt_latency(42.4), "42ms");
        assert_eq!(fmt_latency(1_250.0), "1.25s");
    }

    #[test]
    fn error_rate_is_a_fraction_not_a_percentage() {
        assert_eq!(fmt_percent(0.053), "5.3%");
        assert_eq!(fmt_percent(1.7), "100.0%");
    }

    #[test]
    fn small_timestamps_render_as_age() {
        assert_eq!(fmt_anomaly_time(45), "45s ago");
    }

    #[test]
    fn epoch_timestamps_render_as_wall_clock() {
        let formatted = fmt_anomaly_time(1_700_000_000);
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.matches(':').count(), 2);
    }
}
