//! Record and catalog validation.
//!
//! Checks structural invariants of snippet records and catalogs
//! before they are written out: non-empty prefixes and bodies, and
//! key shapes of the form `<product>/<prefix>` or
//! `<product>/<prefix>_<index>` that agree with the record's own
//! prefix.
//!
//! # Examples
//!
//! ```
//! use helpdoc_snippets_core::{SnippetRecord, validate_record};
//!
//! let record = SnippetRecord::new("plot", "plot(${X})", "2-D line plot");
//! assert!(validate_record("matlab/plot", &record).is_empty());
//!
//! // Key names a different function than the record's prefix.
//! assert!(!validate_record("matlab/surf", &record).is_empty());
//! ```

use thiserror::Error;

use crate::{SnippetCatalog, SnippetRecord};

/// Record/catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Record prefix is empty or whitespace-only.
    #[error("record prefix cannot be empty: {0}")]
    EmptyPrefix(String),
    /// Record has no body lines.
    #[error("record body cannot be empty: {0}")]
    EmptyBody(String),
    /// Key is not of the form `<product>/<name>`.
    #[error("malformed record key: {0}")]
    MalformedKey(String),
    /// Key's name part does not match the record prefix.
    #[error("key '{key}' does not match record prefix '{prefix}'")]
    KeyPrefixMismatch { key: String, prefix: String },
}

/// Validates one keyed record, collecting every problem found.
pub fn validate_record(key: &str, record: &SnippetRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if record.prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyPrefix(key.to_string()));
    }
    if record.body.is_empty() || record.body.iter().all(|line| line.trim().is_empty()) {
        errors.push(ValidationError::EmptyBody(key.to_string()));
    }

    match key.split_once('/') {
        Some((product, name)) if !product.is_empty() && !name.is_empty() => {
            if !record.prefix.is_empty() && !key_matches_prefix(name, &record.prefix) {
                errors.push(ValidationError::KeyPrefixMismatch {
                    key: key.to_string(),
                    prefix: record.prefix.clone(),
                });
            }
        }
        _ => errors.push(ValidationError::MalformedKey(key.to_string())),
    }

    errors
}

/// Validates every record in a catalog.
pub fn validate_catalog(catalog: &SnippetCatalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (key, record) in catalog.iter() {
        errors.extend(validate_record(key, record));
    }
    errors
}

/// The name part is the prefix itself or `<prefix>_<index>`.
fn key_matches_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('_')
            .is_some_and(|index| !index.is_empty() && index.chars().all(|ch| ch.is_ascii_digit())),
        None => false,
    }
}
