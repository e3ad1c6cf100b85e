//! Snippet record and catalog definitions.
//!
//! This module defines the externally visible data model: one
//! completion snippet per documented call shape, collected into a
//! key-sorted catalog. The types are designed for serialization with
//! [`serde`] and round-trip through the JSON files the harvester and
//! merger exchange.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One completion snippet, as consumed by editor snippet engines.
///
/// Multiple records share a `prefix` when a function documents more
/// than one call shape; the catalog key disambiguates them (see
/// [`record_key`]).
///
/// # Examples
///
/// ```
/// use helpdoc_snippets_core::SnippetRecord;
///
/// let record = SnippetRecord::new("plot", "plot(${X}, ${Y})", "2-D line plot");
/// assert_eq!(record.prefix, "plot");
/// assert_eq!(record.body, vec!["plot(${X}, ${Y})".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    /// Trigger prefix: the documented function or command name.
    pub prefix: String,
    /// Template lines; variable parameters carry `${label}` markers.
    pub body: Vec<String>,
    /// Human-readable text shown next to the completion.
    pub description: String,
}

impl SnippetRecord {
    /// Creates a single-line record.
    pub fn new(
        prefix: impl Into<String>,
        body_line: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            body: vec![body_line.into()],
            description: description.into(),
        }
    }
}

/// Builds the catalog key for one record.
///
/// The first documented call shape of a function keeps the bare
/// `<product>/<prefix>` key; later shapes are disambiguated with a
/// `_<index>` suffix.
///
/// # Examples
///
/// ```
/// use helpdoc_snippets_core::record_key;
///
/// assert_eq!(record_key("matlab", "plot", 0), "matlab/plot");
/// assert_eq!(record_key("matlab", "plot", 2), "matlab/plot_2");
/// ```
pub fn record_key(product: &str, prefix: &str, variant: usize) -> String {
    if variant == 0 {
        format!("{product}/{prefix}")
    } else {
        format!("{product}/{prefix}_{variant}")
    }
}

/// Key-sorted snippet catalog.
///
/// Wraps a [`BTreeMap`] so iteration and serialization always emit
/// keys in sorted order, keeping catalog files stable and diffable
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetCatalog {
    records: BTreeMap<String, SnippetRecord>,
}

impl SnippetCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the value it replaced, if any.
    pub fn insert(&mut self, key: impl Into<String>, record: SnippetRecord) -> Option<SnippetRecord> {
        self.records.insert(key.into(), record)
    }

    /// Looks up a record by key.
    pub fn get(&self, key: &str) -> Option<&SnippetRecord> {
        self.records.get(key)
    }

    /// Returns the number of records in this catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SnippetRecord)> {
        self.records.iter()
    }
}

impl Extend<(String, SnippetRecord)> for SnippetCatalog {
    fn extend<I: IntoIterator<Item = (String, SnippetRecord)>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
