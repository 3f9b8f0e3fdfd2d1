//! Human-friendly duration strings ("15m", "30s", "1h").

use anyhow::Result;
use chrono::Duration;

/// Parse a duration string like "7d", "24h", "30m", "45s".
///
/// A bare number is read as seconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value = value.trim().to_lowercase();

    if let Some(days) = value.strip_suffix('d') {
        let n: i64 = days.parse()?;
        Ok(Duration::days(n))
    } else if let Some(hours) = value.strip_suffix('h') {
        let n: i64 = hours.parse()?;
        Ok(Duration::hours(n))
    } else if let Some(mins) = value.strip_suffix('m') {
        let n: i64 = mins.parse()?;
        Ok(Duration::minutes(n))
    } else if let Some(secs) = value.strip_suffix('s') {
        let n: i64 = secs.parse()?;
        Ok(Duration::seconds(n))
    } else {
        let n: i64 = value.parse()?;
        Ok(Duration::seconds(n))
    }
}

/// Format a duration for display, using its largest whole unit.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();

    if secs >= 86400 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
