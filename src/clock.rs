use chrono::Utc;

/// Current Unix epoch time in nanoseconds.
///
/// Saturates at `i64::MAX` for dates past 2262, which chrono cannot express
/// in nanoseconds.
#[must_use]
pub fn unix_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
