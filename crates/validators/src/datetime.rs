//! RFC 3339 date-time validation (`format: date-time`)

use chrono::DateTime;

use crate::error::ValidationError;

/// Check that `value` parses as an RFC 3339 timestamp.
pub fn validate_datetime(value: &str) -> Result<(), ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidDateTime(format!("{:?}: {}", value, e)))
}
