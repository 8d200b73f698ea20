//! Formatting helpers for terminal output.

use std::time::Duration;

/// Longest file name shown unabridged.
pub const DISPLAY_NAME_MAX: usize = 58;
const DISPLAY_NAME_EDGE: usize = 27;

/// Shortens long file names to `head....tail` for display.
///
/// Only affects what is printed; files on disk keep their full names.
#[must_use]
pub fn display_name(name: &str) -> String {
    let count = name.chars().count();
    if count <= DISPLAY_NAME_MAX {
        return name.to_string();
    }
    let head: String = name.chars().take(DISPLAY_NAME_EDGE).collect();
    let tail: String = name.chars().skip(count - DISPLAY_NAME_EDGE).collect();
    format!("{}....{}", head.trim(), tail.trim())
}

/// Formats a byte count as a human-readable string (B, KB, MB, GB).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Formats a duration as a human-readable string (e.g. "5.0s", "1m 05s", "1h 01m 05s").
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!(
            "{}h {:02}m {:02}s",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{:01}s", secs, d.subsec_millis() / 100)
    }
}
