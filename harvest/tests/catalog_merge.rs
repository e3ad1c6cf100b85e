use std::collections::BTreeMap;
use std::fs;

use helpdoc_snippets_core::{SnippetRecord, merge_catalog};
use helpdoc_snippets_harvest::output::{read_overrides, read_records, write_catalog, write_records};

fn record(prefix: &str, body: &str) -> SnippetRecord {
    SnippetRecord::new(prefix, body, format!("matlab/{prefix}\n\n{body}"))
}

#[test]
fn test_records_file_preserves_duplicates_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("funcs.json");

    let records = vec![
        ("matlab/foo".to_string(), record("foo", "foo(${A})")),
        ("matlab/bar".to_string(), record("bar", "bar(${X})")),
        ("matlab/foo".to_string(), record("foo", "foo(${A}, ${B})")),
    ];
    write_records(&path, &records).unwrap();

    let read_back = read_records(&path).unwrap();
    assert_eq!(read_back.len(), 3);
    assert_eq!(read_back[0].0, "matlab/foo");
    assert_eq!(read_back[2].1.body, vec!["foo(${A}, ${B})".to_string()]);
}

#[test]
fn test_merge_applies_overrides_over_crawl_output() {
    let dir = tempfile::tempdir().unwrap();
    let records_path = dir.path().join("funcs.json");
    let patch_path = dir.path().join("patch.json");

    write_records(
        &records_path,
        &[("matlab/foo".to_string(), record("foo", "foo(${A})"))],
    )
    .unwrap();

    let patch = BTreeMap::from([("matlab/foo".to_string(), record("foo", "foo(${patched})"))]);
    fs::write(&patch_path, serde_json::to_string_pretty(&patch).unwrap()).unwrap();

    let entries = read_records(&records_path).unwrap();
    let overrides = read_overrides(&patch_path).unwrap();
    let catalog = merge_catalog(entries, overrides);

    assert_eq!(
        catalog.get("matlab/foo").unwrap().body,
        vec!["foo(${patched})".to_string()]
    );
}

#[test]
fn test_merged_catalog_file_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let first_path = dir.path().join("snippets-a.json");
    let second_path = dir.path().join("snippets-b.json");

    let entries = vec![
        ("matlab/zeros".to_string(), record("zeros", "zeros(${n})")),
        ("matlab/abs".to_string(), record("abs", "abs(${X})")),
        ("matlab/zeros".to_string(), record("zeros", "zeros(${n}, ${m})")),
    ];
    let overrides = BTreeMap::from([("matlab/ones".to_string(), record("ones", "ones(${n})"))]);

    let catalog = merge_catalog(entries.clone(), overrides.clone());
    write_catalog(&first_path, &catalog).unwrap();

    let again = merge_catalog(entries, overrides);
    write_catalog(&second_path, &again).unwrap();

    let first_raw = fs::read_to_string(&first_path).unwrap();
    let second_raw = fs::read_to_string(&second_path).unwrap();
    assert_eq!(first_raw, second_raw);

    // Keys come out sorted regardless of harvest order.
    let abs_at = first_raw.find("matlab/abs").unwrap();
    let zeros_at = first_raw.find("matlab/zeros").unwrap();
    assert!(abs_at < zeros_at);
}
