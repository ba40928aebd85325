//! Base64 validation (`format: byte`)

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ValidationError;

/// Check that `value` is standard, padded base64.
pub fn validate_base64(value: &str) -> Result<(), ValidationError> {
    STANDARD
        .decode(value)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidBase64(e.to_string()))
}
