//! HTML extraction: reference page markup → [`PageDocument`].
//!
//! This is the parse-document half of the crawling collaborator. It
//! locates the titled sections of a reference page and hands the
//! parser plain text only; selector details never leak past this
//! module.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::page::{PageDocument, SyntaxBlock};

static SELECTORS: LazyLock<PageSelectors> = LazyLock::new(PageSelectors::new);

struct PageSelectors {
    ref_sect: Selector,
    heading: Selector,
    refname: Selector,
    page_title: Selector,
    synopsis: Selector,
    description_element: Selector,
}

impl PageSelectors {
    fn new() -> Self {
        Self {
            ref_sect: Selector::parse("div.ref_sect").expect("static selector must parse"),
            heading: Selector::parse("h2, h3").expect("static selector must parse"),
            refname: Selector::parse("span.refname").expect("static selector must parse"),
            page_title: Selector::parse(r#"h1[itemprop="title"]"#)
                .expect("static selector must parse"),
            synopsis: Selector::parse("div.synopsis").expect("static selector must parse"),
            description_element: Selector::parse("div.description_element")
                .expect("static selector must parse"),
        }
    }
}

/// Extracts the parser-facing page model from raw page markup.
pub fn extract_page(url: &str, product: &str, html: &str) -> PageDocument {
    let document = Html::parse_document(html);

    let title = document
        .select(&SELECTORS.refname)
        .next()
        .or_else(|| document.select(&SELECTORS.page_title).next())
        .map(element_text)
        .unwrap_or_default();

    let mut has_language_variants = false;
    let mut syntax_text = None;
    let mut syntaxes: Vec<String> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();

    for section in document.select(&SELECTORS.ref_sect) {
        let Some(heading) = section.select(&SELECTORS.heading).next() else {
            continue;
        };
        match element_text(heading).as_str() {
            "Languages" => has_language_variants = true,
            "Syntax" => {
                syntax_text = Some(section_text(section));
                syntaxes = section
                    .select(&SELECTORS.synopsis)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect();
            }
            "Description" => {
                descriptions = section
                    .select(&SELECTORS.description_element)
                    .map(element_text)
                    .collect();
            }
            _ => {}
        }
    }

    if !syntaxes.is_empty() && descriptions.len() != syntaxes.len() {
        warn!(
            url,
            syntaxes = syntaxes.len(),
            descriptions = descriptions.len(),
            "syntax/description block count mismatch"
        );
    }

    let blocks = syntaxes
        .iter()
        .enumerate()
        .map(|(index, syntax)| SyntaxBlock {
            syntax: syntax.clone(),
            // Unpaired blocks fall back to their own syntax line.
            description: descriptions.get(index).cloned().unwrap_or_else(|| syntax.clone()),
        })
        .collect();

    PageDocument {
        url: url.to_string(),
        product: product.to_string(),
        title,
        has_language_variants,
        syntax_text,
        blocks,
    }
}

/// Whitespace-normalized text content of one element.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of a section with its headings removed, one line per text
/// fragment; the prefix scan works line by line.
fn section_text(section: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    for child in section.children() {
        let Some(element) = ElementRef::wrap(child) else {
            continue;
        };
        if matches!(element.value().name(), "h2" | "h3") {
            continue;
        }
        let text = element_text(element);
        if !text.is_empty() {
            lines.push(text);
        }
    }
    lines.join("\n")
}
