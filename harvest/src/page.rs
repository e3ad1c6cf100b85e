//! Page-level record building and rejection rules.
//!
//! One [`PageDocument`] yields zero or more keyed snippet records.
//! Rejections are page-local values, never fatal: a rejected page
//! simply contributes nothing to the catalog.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use helpdoc_snippets_core::{SnippetRecord, record_key};

use crate::parser::{OverloadSet, render_block};

/// One documentation page, as produced by the extraction layer.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub url: String,
    /// Product id the page belongs to, e.g. `matlab`.
    pub product: String,
    pub title: String,
    /// A "Languages" section marks a foreign-language page variant.
    pub has_language_variants: bool,
    /// Plain text of the Syntax section, headings removed.
    pub syntax_text: Option<String>,
    /// Per-syntax-block fragments in document order.
    pub blocks: Vec<SyntaxBlock>,
}

/// One documented call shape with its descriptive text.
#[derive(Debug, Clone)]
pub struct SyntaxBlock {
    pub syntax: String,
    pub description: String,
}

/// Why a whole page was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRejection {
    /// The page documents foreign-language variants of a function.
    #[error("page documents foreign-language variants")]
    UnsupportedLanguage,
    /// No Syntax section was found.
    #[error("page has no Syntax section")]
    MissingSyntax,
    /// No syntax line yields a prefix matching the title or URL.
    #[error("no syntax line yields a prefix matching the page title or URL")]
    InvalidPrefix,
}

/// Records and non-fatal diagnostics from one accepted page.
#[derive(Debug, Default)]
pub struct PageBuild {
    pub records: Vec<(String, SnippetRecord)>,
    pub warnings: Vec<String>,
}

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z._]+$").expect("static regex must compile"));

/// Builds the snippet records for one page.
///
/// Syntax blocks are processed in document order because elided
/// blocks resolve against the full blocks before them. A bad block is
/// skipped with a warning; only page-shape problems reject the page.
pub fn build_page_records(page: &PageDocument) -> Result<PageBuild, PageRejection> {
    if page.has_language_variants {
        return Err(PageRejection::UnsupportedLanguage);
    }
    let syntax_text = page
        .syntax_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(PageRejection::MissingSyntax)?;
    let prefix =
        detect_prefix(syntax_text, &page.title, &page.url).ok_or(PageRejection::InvalidPrefix)?;

    let mut build = PageBuild::default();

    if page.blocks.is_empty() {
        // Flat legacy pages document every call shape in one block of
        // text; they collapse to a single record.
        let key = record_key(&page.product, &prefix, 0);
        let description = describe(&key, syntax_text, &page.url);
        build.records.push((
            key,
            SnippetRecord::new(prefix, syntax_text, description),
        ));
        return Ok(build);
    }

    let mut overloads = OverloadSet::new();
    for (index, block) in page.blocks.iter().enumerate() {
        let rendered = match render_block(&block.syntax, &prefix, &mut overloads) {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(url = %page.url, block = index, %err, "skipping syntax block");
                build.warnings.push(format!("block {index}: {err}"));
                continue;
            }
        };
        let key = record_key(&page.product, &prefix, index);
        let description = describe(&key, &block.description, &page.url);
        build
            .records
            .push((key, SnippetRecord::new(prefix.clone(), rendered, description)));
    }

    Ok(build)
}

/// Ordered search over syntax lines for the page prefix.
///
/// A candidate is the line text before any `(`, after the last `=`,
/// before the first space. The first candidate that is a plain
/// identifier and occurs (case-insensitively) in the page title or
/// URL wins; no match rejects the page.
fn detect_prefix(syntax_text: &str, title: &str, url: &str) -> Option<String> {
    let title_lower = title.to_lowercase();
    let url_lower = url.to_lowercase();

    for line in syntax_text.lines() {
        let candidate = candidate_prefix(line);
        if candidate.is_empty() || !PREFIX_RE.is_match(candidate) {
            continue;
        }
        let lower = candidate.to_lowercase();
        if title_lower.contains(&lower) || url_lower.contains(&lower) {
            return Some(candidate.to_string());
        }
    }
    None
}

fn candidate_prefix(line: &str) -> &str {
    let head = line.trim().split('(').next().unwrap_or_default();
    let rhs = head.trim().rsplit('=').next().unwrap_or_default();
    rhs.trim().split(' ').next().unwrap_or_default().trim()
}

fn describe(key: &str, text: &str, url: &str) -> String {
    format!("{key}\n\n{text}\n\nref: {url}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(blocks: Vec<SyntaxBlock>, syntax_text: &str) -> PageDocument {
        PageDocument {
            url: "https://example.com/help/matlab/ref/foo.html".to_string(),
            product: "matlab".to_string(),
            title: "foo".to_string(),
            has_language_variants: false,
            syntax_text: Some(syntax_text.to_string()),
            blocks,
        }
    }

    fn block(syntax: &str) -> SyntaxBlock {
        SyntaxBlock {
            syntax: syntax.to_string(),
            description: format!("use {syntax}"),
        }
    }

    #[test]
    fn test_language_variant_pages_are_rejected() {
        let mut doc = page(vec![], "foo(A)");
        doc.has_language_variants = true;
        assert_eq!(
            build_page_records(&doc).unwrap_err(),
            PageRejection::UnsupportedLanguage
        );
    }

    #[test]
    fn test_pages_without_syntax_are_rejected() {
        let mut doc = page(vec![], "foo(A)");
        doc.syntax_text = None;
        assert_eq!(
            build_page_records(&doc).unwrap_err(),
            PageRejection::MissingSyntax
        );

        doc.syntax_text = Some("   ".to_string());
        assert_eq!(
            build_page_records(&doc).unwrap_err(),
            PageRejection::MissingSyntax
        );
    }

    #[test]
    fn test_prefix_must_match_title_or_url() {
        let mut doc = page(vec![block("bar(A)")], "bar(A)");
        doc.title = "something else".to_string();
        doc.url = "https://example.com/help/other.html".to_string();
        assert_eq!(
            build_page_records(&doc).unwrap_err(),
            PageRejection::InvalidPrefix
        );
    }

    #[test]
    fn test_prefix_can_match_url_when_title_does_not() {
        let mut doc = page(vec![block("foo(A)")], "foo(A)");
        doc.title = "Do something useful".to_string();
        let build = build_page_records(&doc).unwrap();
        assert_eq!(build.records[0].0, "matlab/foo");
    }

    #[test]
    fn test_prefix_skips_non_identifier_lines() {
        let text = "see also:\nB = foo(A)";
        let doc = page(vec![block("B = foo(A)")], text);
        let build = build_page_records(&doc).unwrap();
        assert_eq!(build.records[0].1.prefix, "foo");
    }

    #[test]
    fn test_variant_keys_use_block_index() {
        let doc = page(
            vec![block("foo(A)"), block("foo(A,B)"), block("foo(A,B,C)")],
            "foo(A)\nfoo(A,B)\nfoo(A,B,C)",
        );
        let build = build_page_records(&doc).unwrap();
        let keys: Vec<&str> = build.records.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["matlab/foo", "matlab/foo_1", "matlab/foo_2"]);
    }

    #[test]
    fn test_skipped_block_keeps_later_indices() {
        // The elided block cannot resolve (no prior full shape) and is
        // skipped; the next block keeps its document-order index.
        let doc = page(
            vec![block("foo(___)"), block("foo(A)")],
            "foo(___)\nfoo(A)",
        );
        let build = build_page_records(&doc).unwrap();
        let keys: Vec<&str> = build.records.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["matlab/foo_1"]);
        assert_eq!(build.warnings.len(), 1);
    }

    #[test]
    fn test_flat_page_emits_single_fallback_record() {
        let text = "foo(A)\nfoo(A,B)";
        let doc = page(vec![], text);
        let build = build_page_records(&doc).unwrap();
        assert_eq!(build.records.len(), 1);

        let (key, record) = &build.records[0];
        assert_eq!(key, "matlab/foo");
        assert_eq!(record.body, vec![text.to_string()]);
        assert!(record.description.contains(text));
        assert!(record.description.contains("ref: https://"));
    }

    #[test]
    fn test_elided_block_renders_choice_list() {
        let doc = page(
            vec![block("foo(A)"), block("foo(A,B)"), block("foo(A,B,___)")],
            "foo(A)\nfoo(A,B)\nfoo(A,B,___)",
        );
        let build = build_page_records(&doc).unwrap();
        let rendered = &build.records[2].1.body[0];
        assert!(rendered.contains("${1|"));
        assert!(rendered.contains("A\\, B"));
    }
}
