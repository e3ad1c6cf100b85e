//! Syntax-line parsing for documentation reference pages.
//!
//! Turns loosely structured, human-authored syntax listings such as
//! `[x,y] = foo(A,B,___)` into normalized completion templates. The
//! pipeline has three stages:
//!
//! - **Tokenizing** — classify the line as a function call or a
//!   command, collapse repeated-argument ellipses, strip output
//!   bindings, and split into identifier tokens.
//! - **Rendering** — wrap variable parameters in `${label}`
//!   placeholders while leaving constants (quoted values, `name=value`
//!   pairs, `-flags`) literal.
//! - **Consolidating** — resolve the `___` elision marker against the
//!   full call shapes documented earlier on the same page.
//!
//! Parsing is pure and page-local: the only state is the
//! [`OverloadSet`] accumulated for one page, which must never be
//! shared across pages or concurrent fetches.

mod consolidate;
mod render;
mod tokenize;

pub use consolidate::OverloadSet;
pub use render::{plain_signature, render_params, render_snippet};
pub use tokenize::{ParsedSyntax, parse_syntax};

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Elision marker used by the documentation to mean "any previously
/// shown argument combination, plus more".
pub const ELISION_MARKER: &str = "___";

/// Regex patterns shared by the parsing stages.
pub(crate) static PATTERNS: LazyLock<SyntaxPatterns> = LazyLock::new(SyntaxPatterns::new);

pub(crate) struct SyntaxPatterns {
    /// Literal ellipsis dots or the ellipsis glyph.
    pub(crate) ellipsis: Regex,
    /// Word/dot callee token directly before an opening paren.
    pub(crate) call_callee: Regex,
}

impl SyntaxPatterns {
    fn new() -> Self {
        Self {
            ellipsis: Regex::new(r"\.\.\.|…").expect("static regex must compile"),
            call_callee: Regex::new(r"([A-Za-z][A-Za-z0-9_.]*)\s*\(")
                .expect("static regex must compile"),
        }
    }
}

/// Why one syntax block produced no template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockError {
    /// An elided syntax appeared before any full call shape.
    #[error("elided syntax has no preceding full call shape")]
    UnresolvedElision,
    /// The marker appeared more than once in a single syntax.
    #[error("syntax contains {markers} elision markers, expected at most one")]
    MalformedElision { markers: usize },
}

/// Renders one documented syntax line against the page's overload
/// context.
///
/// Lines must be fed in document order: full call shapes are recorded
/// into `overloads` as they are seen, and an elided shape resolves
/// against exactly the shapes recorded before it.
pub fn render_block(
    raw: &str,
    fallback_name: &str,
    overloads: &mut OverloadSet,
) -> Result<String, BlockError> {
    let syntax = parse_syntax(raw, fallback_name);
    let markers = syntax
        .params()
        .iter()
        .filter(|token| *token == ELISION_MARKER)
        .count();

    match markers {
        0 => {
            overloads.record(&syntax);
            Ok(render_snippet(&syntax, None))
        }
        1 => {
            let substitution = overloads
                .resolve_elision()
                .ok_or(BlockError::UnresolvedElision)?;
            Ok(render_snippet(&syntax, Some(&substitution)))
        }
        _ => Err(BlockError::MalformedElision { markers }),
    }
}
