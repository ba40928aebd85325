//! Validation errors

use thiserror::Error;

/// Errors reported by attribute validators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is not valid standard base64
    #[error("value must be base64 encoded: {0}")]
    InvalidBase64(String),

    /// Value is not an RFC 3339 timestamp
    #[error("value must be an RFC 3339 date-time: {0}")]
    InvalidDateTime(String),

    /// Value is not a DNS-1123 subdomain
    #[error("invalid name {value:?}: {reason}")]
    InvalidName {
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Map key is not a qualified name
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// Offending key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// Label value is malformed
    #[error("invalid value {value:?} for label {key:?}: {reason}")]
    InvalidLabelValue {
        /// Label key
        key: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Annotations exceed the total size limit
    #[error("annotations are too large: {size} bytes, must be no more than {limit} bytes")]
    AnnotationsTooLarge {
        /// Total size of keys and values
        size: usize,
        /// Maximum allowed size
        limit: usize,
    },

    /// Integer lies outside the range of its declared type
    #[error("value {value} is out of range, {}", describe_range(*min, *max))]
    OutOfRange {
        /// Offending value
        value: i128,
        /// Smallest accepted value
        min: Option<i64>,
        /// Largest accepted value
        max: Option<i64>,
    },

    /// Value is not one of the allowed values
    #[error("value {value:?} must be one of: {}", allowed.join(", "))]
    NotOneOf {
        /// Offending value
        value: String,
        /// Allowed values
        allowed: Vec<String>,
    },
}

/// Text form of an inclusive integer range
pub fn describe_range(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        (Some(min), None) => format!("must be at least {}", min),
        (None, Some(max)) => format!("must be at most {}", max),
        (None, None) => "any integer is accepted".to_string(),
    }
}
