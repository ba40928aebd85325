//! Resource id generation

use chrono::Utc;

/// Generate a resource id from the current time.
///
/// The id is the number of nanoseconds since the Unix epoch, rendered as a
/// decimal string. Timestamps past the year 2262 do not fit in an `i64`
/// nanosecond count and fall back to microsecond precision.
pub fn generate_id() -> String {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
        .to_string()
}
