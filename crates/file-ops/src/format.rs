//! Plain-text rendering for directory listings.

use std::time::{Duration, SystemTime};

use crate::browse::DirEntry;

const SIZE_WIDTH: usize = 12;
const AGE_WIDTH: usize = 15;

/// Formats a byte count with binary units, e.g. `1.50 KB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

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

/// Formats how long ago something happened, e.g. `3 minutes ago`.
pub fn format_age(age: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    let secs = age.as_secs();
    let (count, unit) = match secs {
        0 => return "just now".to_string(),
        s if s < MINUTE => (s, "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Renders a listing as a table of size, age and name.
///
/// Directories get a trailing `/`. Entries with no modification time, or
/// one in the future relative to `now`, show as `just now`.
pub fn render_listing(entries: &[DirEntry], now: SystemTime) -> String {
    let mut out = format!("{:<SIZE_WIDTH$}\t{:<AGE_WIDTH$}\tNAME\n", "SIZE", "MODIFIED");

    for entry in entries {
        let age = entry
            .modified
            .and_then(|m| now.duration_since(m).ok())
            .unwrap_or_default();
        let suffix = if entry.is_dir { "/" } else { "" };

        out.push_str(&format!(
            "{:<SIZE_WIDTH$}\t{:<AGE_WIDTH$}\t{}{suffix}\n",
            format_bytes(entry.size),
            format_age(age),
            entry.name,
        ));
    }

    out
}
