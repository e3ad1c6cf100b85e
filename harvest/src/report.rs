//! Structured reporting for harvest runs.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::page::PageRejection;

/// Why a page produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    UnsupportedLanguage,
    MissingSyntax,
    InvalidPrefix,
    FetchFailed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::UnsupportedLanguage => "unsupported_language",
            RejectReason::MissingSyntax => "missing_syntax",
            RejectReason::InvalidPrefix => "invalid_prefix",
            RejectReason::FetchFailed => "fetch_failed",
        };
        f.write_str(label)
    }
}

impl From<PageRejection> for RejectReason {
    fn from(rejection: PageRejection) -> Self {
        match rejection {
            PageRejection::UnsupportedLanguage => RejectReason::UnsupportedLanguage,
            PageRejection::MissingSyntax => RejectReason::MissingSyntax,
            PageRejection::InvalidPrefix => RejectReason::InvalidPrefix,
        }
    }
}

/// Outcome of processing one documentation page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub success: bool,
    pub records_emitted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<RejectReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Non-fatal block-level diagnostics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PageReport {
    /// Report for an accepted page.
    pub fn accepted(url: impl Into<String>, records_emitted: usize, warnings: Vec<String>) -> Self {
        Self {
            url: url.into(),
            success: true,
            records_emitted,
            reject_reason: None,
            detail: None,
            warnings,
        }
    }

    /// Report for a page skipped by shape rules.
    pub fn rejected(url: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            url: url.into(),
            success: false,
            records_emitted: 0,
            reject_reason: Some(reason),
            detail: None,
            warnings: Vec::new(),
        }
    }

    /// Report for a page whose fetch failed at the transport level.
    pub fn fetch_failed(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success: false,
            records_emitted: 0,
            reject_reason: Some(RejectReason::FetchFailed),
            detail: Some(detail.into()),
            warnings: Vec::new(),
        }
    }
}

/// Batch report for a full harvest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestReportBundle {
    pub generated_at: String,
    pub version: String,
    pub pages: Vec<PageReport>,
    pub rejected_pages: usize,
}

/// Bundles per-page reports with run metadata.
pub fn build_report_bundle(version: &str, pages: Vec<PageReport>) -> HarvestReportBundle {
    let rejected_pages = pages.iter().filter(|page| !page.success).count();
    HarvestReportBundle {
        generated_at: Utc::now().to_rfc3339(),
        version: version.to_string(),
        pages,
        rejected_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_counts_rejected_pages() {
        let pages = vec![
            PageReport::accepted("https://example.com/a", 2, Vec::new()),
            PageReport::rejected("https://example.com/b", RejectReason::MissingSyntax),
            PageReport::fetch_failed("https://example.com/c", "timeout"),
        ];

        let bundle = build_report_bundle("1.0.0", pages);
        assert_eq!(bundle.rejected_pages, 2);
        assert_eq!(bundle.pages.len(), 3);
    }

    #[test]
    fn test_report_round_trips_json() {
        let report = PageReport::rejected("https://example.com/b", RejectReason::InvalidPrefix);
        let raw = serde_json::to_string(&report).unwrap();
        assert!(raw.contains("invalid_prefix"));

        let parsed: PageReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.reject_reason, Some(RejectReason::InvalidPrefix));
    }
}
