//! Syntax line tokenization.
//!
//! One raw syntax line becomes a [`ParsedSyntax`]: the call form flag
//! plus the callee and parameter tokens, after ellipsis collapsing and
//! output-binding removal.

use super::{ELISION_MARKER, PATTERNS};

/// One tokenized syntax line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSyntax {
    call_form: bool,
    tokens: Vec<String>,
}

impl ParsedSyntax {
    /// `true` for `name(arg, ...)` lines, `false` for space-separated
    /// command lines.
    pub fn call_form(&self) -> bool {
        self.call_form
    }

    /// The callee name.
    pub fn name(&self) -> &str {
        &self.tokens[0]
    }

    /// Parameter tokens in document order.
    pub fn params(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// `true` when any parameter is the elision marker.
    pub fn has_elision(&self) -> bool {
        self.params().iter().any(|token| token == ELISION_MARKER)
    }
}

/// Tokenizes one raw syntax line.
///
/// The token list is never empty: a line that yields no tokens (for
/// example, pure markup noise) falls back to the caller-supplied page
/// prefix as the callee name.
pub fn parse_syntax(raw: &str, fallback_name: &str) -> ParsedSyntax {
    let call_form = raw.contains('(');
    let collapsed = collapse_ellipsis(raw);
    let stripped = strip_return_values(&collapsed, call_form);

    let mut tokens: Vec<String> = stripped
        .replace([',', '(', ')'], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        tokens.push(fallback_name.to_string());
    }

    ParsedSyntax { call_form, tokens }
}

/// Collapses repeated-argument runs such as `x1,...,xN` (or
/// `x1,x2,...,xN`) into a single `x1_xN` element.
///
/// The `regex` crate has no back-references, so the run shape is found
/// with a plain ellipsis scan and the base-name consistency is
/// verified explicitly: the elements around the dots must share one
/// base name, and the final element must carry a trailing index
/// variable. `x1,...,yN` stays untouched.
fn collapse_ellipsis(raw: &str) -> String {
    let mut spans: Vec<(usize, usize, String)> = Vec::new();
    for found in PATTERNS.ellipsis.find_iter(raw) {
        if let Some(span) = collapse_run(raw, found.start(), found.end()) {
            let overlaps = spans.last().is_some_and(|(_, end, _)| span.0 < *end);
            if !overlaps {
                spans.push(span);
            }
        }
    }
    if spans.is_empty() {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for (start, end, merged) in spans {
        out.push_str(&raw[cursor..start]);
        out.push_str(&merged);
        cursor = end;
    }
    out.push_str(&raw[cursor..]);
    out
}

fn collapse_run(raw: &str, ellipsis_start: usize, ellipsis_end: usize) -> Option<(usize, usize, String)> {
    let (prev, prev_start) = ident_before(raw, ellipsis_start)?;
    let base = index_base(prev)?;

    // An optional second indexed element before the dots widens the
    // run: `x1,x2,...,xN` starts at `x1`.
    let mut run_start = prev_start;
    let mut first = prev;
    if let Some((earlier, earlier_start)) = ident_before(raw, prev_start) {
        if index_base(earlier) == Some(base) {
            run_start = earlier_start;
            first = earlier;
        }
    }

    let (last, run_end) = ident_after(raw, ellipsis_end)?;
    let tail = last.strip_prefix(base)?;
    if tail.is_empty() {
        return None;
    }

    Some((run_start, run_end, format!("{first}_{last}")))
}

/// The base name of an indexed element: `x1` → `x`; plain `x` has no
/// index and no base.
fn index_base(ident: &str) -> Option<&str> {
    let base = ident.trim_end_matches(|ch: char| ch.is_ascii_digit());
    if base.is_empty() || base.len() == ident.len() {
        None
    } else {
        Some(base)
    }
}

/// The identifier directly before a comma ending at `end`, with its
/// start offset.
fn ident_before(raw: &str, end: usize) -> Option<(&str, usize)> {
    let bytes = raw.as_bytes();
    let mut i = end;
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    if i == 0 || bytes[i - 1] != b',' {
        return None;
    }
    i -= 1;
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    let stop = i;
    while i > 0 && (bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_') {
        i -= 1;
    }
    if i == stop {
        return None;
    }
    Some((&raw[i..stop], i))
}

/// The identifier directly after a comma starting at `start`, with the
/// offset just past its end.
fn ident_after(raw: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = raw.as_bytes();
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b',' {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let begin = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == begin {
        return None;
    }
    Some((&raw[begin..i], i))
}

/// Removes left-hand-side output bindings such as `[x,y] = `.
///
/// A call-form line strips up to the last `=` that sits directly
/// before a callee token (a word/dot run followed by `(`). A
/// command-form line containing exactly one `=` keeps only the text
/// after it.
fn strip_return_values(line: &str, call_form: bool) -> &str {
    if call_form {
        let mut strip_at = None;
        for caps in PATTERNS.call_callee.captures_iter(line) {
            if let Some(ident) = caps.get(1) {
                if line[..ident.start()].trim_end().ends_with('=') {
                    strip_at = Some(ident.start());
                }
            }
        }
        return strip_at.map_or(line, |at| &line[at..]);
    }

    if line.matches('=').count() == 1 {
        if let Some((_, rhs)) = line.split_once('=') {
            return rhs;
        }
    }
    line
}
