//! Label and annotation validation
//!
//! Keys are qualified names: an optional DNS-1123 subdomain prefix followed by
//! `/` and a name segment of at most 63 characters.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::name::validate_dns1123_subdomain;

/// Maximum length of a qualified name segment or label value
pub const QUALIFIED_NAME_MAX_LEN: usize = 63;

/// Maximum total size of all annotation keys and values
pub const TOTAL_ANNOTATION_SIZE_LIMIT: usize = 256 * 1024;

static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$").expect("valid regex")
});

/// Check that `key` is a qualified name (`prefix/name` or `name`).
pub fn validate_qualified_name(key: &str) -> Result<(), ValidationError> {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty() {
            return Err(invalid_key(key, "prefix part must not be empty"));
        }
        validate_dns1123_subdomain(prefix).map_err(|e| invalid_key(key, &format!("prefix part {}", e)))?;
    }

    if name.is_empty() {
        return Err(invalid_key(key, "name part must not be empty"));
    }
    if name.len() > QUALIFIED_NAME_MAX_LEN {
        return Err(invalid_key(
            key,
            &format!("name part must be no more than {} characters", QUALIFIED_NAME_MAX_LEN),
        ));
    }
    if !QUALIFIED_NAME.is_match(name) {
        return Err(invalid_key(
            key,
            "name part must consist of alphanumeric characters, '-', '_' or '.', \
             and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

/// Check a single label.
pub fn validate_label(key: &str, value: &str) -> Result<(), ValidationError> {
    validate_qualified_name(key)?;

    if value.len() > QUALIFIED_NAME_MAX_LEN {
        return Err(ValidationError::InvalidLabelValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be no more than {} characters", QUALIFIED_NAME_MAX_LEN),
        });
    }
    if !value.is_empty() && !QUALIFIED_NAME.is_match(value) {
        return Err(ValidationError::InvalidLabelValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be empty or consist of alphanumeric characters, '-', '_' or '.', \
                     and must start and end with an alphanumeric character"
                .to_string(),
        });
    }
    Ok(())
}

/// Check a full set of labels.
pub fn validate_labels<'a>(
    labels: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), ValidationError> {
    labels
        .into_iter()
        .try_for_each(|(key, value)| validate_label(key, value))
}

/// Check a full set of annotations: qualified keys and total size.
pub fn validate_annotations<'a>(
    annotations: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), ValidationError> {
    let mut size = 0usize;
    for (key, value) in annotations {
        validate_qualified_name(key)?;
        size += key.len() + value.len();
    }
    if size > TOTAL_ANNOTATION_SIZE_LIMIT {
        return Err(ValidationError::AnnotationsTooLarge {
            size,
            limit: TOTAL_ANNOTATION_SIZE_LIMIT,
        });
    }
    Ok(())
}

fn invalid_key(key: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
