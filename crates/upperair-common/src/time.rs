//! Time formatting for observation reports.

use chrono::{DateTime, Utc};

/// Format an observation time the way the web application displays it,
/// e.g. "2024-01-15 12:00:00+00:00".
///
/// Sub-second precision is shown as microseconds only when present:
/// "2024-01-15 12:00:00.250000+00:00".
pub fn format_observation_time(dt: &DateTime<Utc>) -> String {
    if dt.timestamp_subsec_micros() == 0 {
        dt.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}
