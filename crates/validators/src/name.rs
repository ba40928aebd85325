//! Kubernetes object name validation
//!
//! Names follow the DNS-1123 rules enforced by the API server.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Maximum length of a DNS-1123 subdomain
pub const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;

/// Maximum length of a DNS-1123 label
pub const DNS1123_LABEL_MAX_LEN: usize = 63;

static DNS1123_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid regex")
});

/// Check that `value` is a DNS-1123 subdomain (object names).
pub fn validate_dns1123_subdomain(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid(value, "must not be empty"));
    }
    if value.len() > DNS1123_SUBDOMAIN_MAX_LEN {
        return Err(invalid(
            value,
            &format!("must be no more than {} characters", DNS1123_SUBDOMAIN_MAX_LEN),
        ));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        return Err(invalid(
            value,
            "must consist of lower case alphanumeric characters, '-' or '.', \
             and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

/// Check that `value` is a DNS-1123 label (namespace names).
pub fn validate_dns1123_label(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid(value, "must not be empty"));
    }
    if value.len() > DNS1123_LABEL_MAX_LEN {
        return Err(invalid(
            value,
            &format!("must be no more than {} characters", DNS1123_LABEL_MAX_LEN),
        ));
    }
    if !DNS1123_LABEL.is_match(value) {
        return Err(invalid(
            value,
            "must consist of lower case alphanumeric characters or '-', \
             and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

fn invalid(value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidName {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
