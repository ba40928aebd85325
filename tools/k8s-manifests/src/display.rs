//! Terminal output for diagnostics

use k8s_manifest_provider::{Diagnostics, Severity};

/// Print diagnostics to stderr, errors first
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    let (errors, warnings): (Vec<_>, Vec<_>) = diagnostics
        .iter()
        .partition(|d| d.severity == Severity::Error);

    for diagnostic in errors.into_iter().chain(warnings) {
        eprintln!("{}", diagnostic);
    }
}
