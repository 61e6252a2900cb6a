//! Display-string helpers for raw registry values.
//!
//! Pure functions, no state. Missing values never error — every path has
//! a `"-"` placeholder so a sparse record still renders a full card.

use chrono::{DateTime, Local};

/// Format an epoch-seconds timestamp as a local date-time string.
///
/// `None`, zero, and negative values all read as "unknown" (the registry
/// stores 0 for never-seen rows) and yield `None`.
pub fn fmt_epoch(ts: Option<i64>) -> Option<String> {
    let ts = ts.filter(|t| *t > 0)?;
    let dt = DateTime::from_timestamp(ts, 0)?;
    Some(
        dt.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}

/// [`fmt_epoch`] with a `"-"` placeholder for unknown.
pub fn fmt_epoch_or_dash(ts: Option<i64>) -> String {
    fmt_epoch(ts).unwrap_or_else(|| "-".into())
}

/// Format an optional integer, `"-"` when absent.
pub fn fmt_num(value: Option<i64>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

/// Borrow an optional string, `"-"` when absent or blank.
pub fn fmt_str(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => "-",
    }
}
