//! File output for harvested records, catalogs, and run reports.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use helpdoc_snippets_core::{SnippetCatalog, SnippetRecord};

use crate::report::HarvestReportBundle;

/// Report output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
    Table,
}

/// Writes harvested records as a JSON array of single-entry
/// `{key: record}` objects.
///
/// The array preserves duplicates and encounter order for the
/// last-wins merge; a plain map would collapse repeated keys too
/// early.
pub fn write_records(path: &Path, records: &[(String, SnippetRecord)]) -> Result<(), String> {
    let entries: Vec<BTreeMap<&str, &SnippetRecord>> = records
        .iter()
        .map(|(key, record)| BTreeMap::from([(key.as_str(), record)]))
        .collect();
    let raw = serde_json::to_string_pretty(&entries)
        .map_err(|err| format!("Failed to serialize records: {err}"))?;
    fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

/// Reads a records file back into entries in file order.
pub fn read_records(path: &Path) -> Result<Vec<(String, SnippetRecord)>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let entries: Vec<BTreeMap<String, SnippetRecord>> = serde_json::from_str(&raw)
        .map_err(|err| format!("Invalid records JSON '{}': {err}", path.display()))?;
    Ok(entries.into_iter().flatten().collect())
}

/// Reads a manual override ("patch") mapping.
pub fn read_overrides(path: &Path) -> Result<BTreeMap<String, SnippetRecord>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("Invalid override JSON '{}': {err}", path.display()))
}

/// Writes the final catalog, pretty-printed and key-sorted.
pub fn write_catalog(path: &Path, catalog: &SnippetCatalog) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(catalog)
        .map_err(|err| format!("Failed to serialize catalog: {err}"))?;
    fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

/// Reads a catalog file.
pub fn read_catalog(path: &Path) -> Result<SnippetCatalog, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("Invalid catalog JSON '{}': {err}", path.display()))
}

/// Formats a run report in the requested output format.
pub fn format_report(bundle: &HarvestReportBundle, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(bundle)
            .map_err(|err| format!("JSON serialization failed: {err}")),
        ReportFormat::Yaml => serde_yaml::to_string(bundle)
            .map_err(|err| format!("YAML serialization failed: {err}")),
        ReportFormat::Table => Ok(report_to_table(bundle)),
    }
}

fn report_to_table(bundle: &HarvestReportBundle) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Harvest {}  pages: {}  rejected: {}\n",
        bundle.version,
        bundle.pages.len(),
        bundle.rejected_pages
    ));

    for page in &bundle.pages {
        let status = if page.success { "OK" } else { "FAIL" };
        out.push_str(&format!(
            "{:<4} {:<3} {}",
            status, page.records_emitted, page.url
        ));
        if let Some(reason) = page.reject_reason {
            out.push_str(&format!("  [{reason}]"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{PageReport, RejectReason, build_report_bundle};

    fn sample_bundle() -> HarvestReportBundle {
        build_report_bundle(
            "1.0.0",
            vec![
                PageReport::accepted("https://example.com/a", 3, Vec::new()),
                PageReport::rejected("https://example.com/b", RejectReason::MissingSyntax),
            ],
        )
    }

    #[test]
    fn test_format_report_json() {
        let raw = format_report(&sample_bundle(), ReportFormat::Json).unwrap();
        assert!(raw.contains("\"rejected_pages\": 1"));
        assert!(raw.contains("missing_syntax"));
    }

    #[test]
    fn test_format_report_yaml() {
        let raw = format_report(&sample_bundle(), ReportFormat::Yaml).unwrap();
        assert!(raw.contains("rejected_pages: 1"));
    }

    #[test]
    fn test_format_report_table() {
        let raw = format_report(&sample_bundle(), ReportFormat::Table).unwrap();
        assert!(raw.contains("OK"));
        assert!(raw.contains("FAIL"));
        assert!(raw.contains("[missing_syntax]"));
    }
}
