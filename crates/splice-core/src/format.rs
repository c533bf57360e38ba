//! Display helpers for times and byte sizes.

/// Formats seconds as `m:ss.cc`.
///
/// Centiseconds are truncated, not rounded; negative and NaN input shows as `0:00.00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    // The epsilon keeps values like 0.29 from truncating to 28 centiseconds.
    let total_cs = (seconds * 100.0 + 1e-6).floor() as u64;
    let minutes = total_cs / 6000;
    let secs = (total_cs / 100) % 60;
    let cs = total_cs % 100;
    format!("{}:{:02}.{:02}", minutes, secs, cs)
}

/// Formats a byte count with binary (1024) units and up to two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
