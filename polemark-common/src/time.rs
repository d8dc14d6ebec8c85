//! Timestamp utilities

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix milliseconds, the unit stored in session records
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}

/// Convert Unix milliseconds back to a UTC timestamp
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
