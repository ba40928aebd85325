//! Naming helpers
//!
//! CRD properties are camelCase (`secretName`, `repoURL`) while attribute
//! names are snake_case (`secret_name`, `repo_url`).

/// Convert a CRD property name to a snake_case attribute name.
///
/// Acronyms are kept together (`skipTLSVerify` -> `skip_tls_verify`) and a
/// trailing plural `s` stays attached to its acronym (`URIs` -> `uris`).
/// Separators (`-`, `.`, `/`, spaces) become underscores.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '.' | '/' | ' ') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            if i > 0 && !out.is_empty() && !out.ends_with('_') {
                let prev = chars[i - 1];
                let next = chars.get(i + 1).copied();
                let starts_word = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase()
                        && next.is_some_and(|n| n.is_lowercase())
                        && !is_acronym_plural(&chars, i + 1));
                if starts_word {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// `s` at `idx` that ends an acronym like `URIs` or `IPs`.
fn is_acronym_plural(chars: &[char], idx: usize) -> bool {
    chars.get(idx) == Some(&'s')
        && chars.get(idx + 1).is_none_or(|c| c.is_uppercase())
}

/// Build the resource type name for a CRD.
///
/// `("k8s", "cert-manager.io", "Certificate", "v1")` becomes
/// `k8s_cert_manager_io_certificate_v1_manifest`.
pub fn resource_type_name(provider: &str, group: &str, kind: &str, version: &str) -> String {
    let group = group.replace(['.', '-'], "_");
    format!(
        "{}_{}_{}_{}_manifest",
        provider,
        group,
        to_snake_case(kind),
        version.to_lowercase()
    )
}
