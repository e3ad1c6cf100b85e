//! Catalog merging: last-wins fold plus manual overrides.
//!
//! Harvest output is a flat list of `(key, record)` entries in
//! completion order and may repeat keys when pages were fetched more
//! than once. The fold keeps the last record per key; the manually
//! curated override mapping is then applied on top and wins
//! unconditionally. Both steps are deterministic, so re-merging the
//! same inputs reproduces the catalog byte for byte.

use std::collections::BTreeMap;

use crate::{SnippetCatalog, SnippetRecord};

/// Folds harvested entries into a catalog, later keys winning.
pub fn fold_records<I>(entries: I) -> SnippetCatalog
where
    I: IntoIterator<Item = (String, SnippetRecord)>,
{
    let mut catalog = SnippetCatalog::new();
    for (key, record) in entries {
        catalog.insert(key, record);
    }
    catalog
}

/// Applies manual override records on top of a merged catalog.
///
/// An override replaces any crawled record with the same key and is
/// inserted as-is when the key is new.
pub fn apply_overrides(catalog: &mut SnippetCatalog, overrides: BTreeMap<String, SnippetRecord>) {
    catalog.extend(overrides);
}

/// Folds harvested entries and applies overrides in one step.
pub fn merge_catalog<I>(entries: I, overrides: BTreeMap<String, SnippetRecord>) -> SnippetCatalog
where
    I: IntoIterator<Item = (String, SnippetRecord)>,
{
    let mut catalog = fold_records(entries);
    apply_overrides(&mut catalog, overrides);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(body: &str) -> SnippetRecord {
        SnippetRecord::new("foo", body, "foo")
    }

    #[test]
    fn test_fold_records_last_key_wins() {
        let entries = vec![
            ("matlab/foo".to_string(), record("foo(${A})")),
            ("matlab/foo".to_string(), record("foo(${A}, ${B})")),
        ];

        let catalog = fold_records(entries);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("matlab/foo").unwrap().body,
            vec!["foo(${A}, ${B})".to_string()]
        );
    }

    #[test]
    fn test_overrides_replace_crawled_records() {
        let entries = vec![("matlab/foo".to_string(), record("foo(${A})"))];
        let overrides = BTreeMap::from([("matlab/foo".to_string(), record("foo(${patched})"))]);

        let catalog = merge_catalog(entries, overrides);
        assert_eq!(
            catalog.get("matlab/foo").unwrap().body,
            vec!["foo(${patched})".to_string()]
        );
    }

    #[test]
    fn test_overrides_add_new_keys() {
        let overrides = BTreeMap::from([("matlab/extra".to_string(), record("extra"))]);

        let catalog = merge_catalog(Vec::new(), overrides);
        assert!(catalog.get("matlab/extra").is_some());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let entries = vec![
            ("matlab/b".to_string(), record("b(${x})")),
            ("matlab/a".to_string(), record("a(${x})")),
            ("matlab/b".to_string(), record("b(${x}, ${y})")),
        ];
        let overrides = BTreeMap::from([("matlab/c".to_string(), record("c"))]);

        let first = merge_catalog(entries.clone(), overrides.clone());
        let second = merge_catalog(entries, overrides);

        let first_raw = serde_json::to_string_pretty(&first).unwrap();
        let second_raw = serde_json::to_string_pretty(&second).unwrap();
        assert_eq!(first_raw, second_raw);
    }
}
