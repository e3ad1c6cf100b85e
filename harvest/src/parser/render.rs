//! Completion template rendering.
//!
//! Variable parameters become `${label}` placeholders carrying their
//! own documented name; constant parameters render literally.

use super::{ELISION_MARKER, ParsedSyntax};

/// Tokens rendered literally rather than as placeholders: quoted
/// values, `name=value` pairs, and `-flag` style options.
fn is_constant(token: &str) -> bool {
    token.contains('\'') || token.contains('"') || token.contains('=') || token.starts_with('-')
}

/// Renders the parameter list of one syntax.
///
/// `substitution`, when given, replaces the elision marker token
/// verbatim; without it the marker renders as its literal text.
pub fn render_params(syntax: &ParsedSyntax, substitution: Option<&str>) -> String {
    let rendered: Vec<String> = syntax
        .params()
        .iter()
        .map(|token| {
            if token == ELISION_MARKER {
                substitution.unwrap_or(token).to_string()
            } else if is_constant(token) {
                token.clone()
            } else {
                format!("${{{token}}}")
            }
        })
        .collect();

    let joined = if syntax.call_form() {
        rendered.join(", ")
    } else {
        rendered.join(" ")
    };
    rewrite_continuation(&joined)
}

/// Renders the full completion template: `name(params)` for call
/// form, `name params` for command form.
pub fn render_snippet(syntax: &ParsedSyntax, substitution: Option<&str>) -> String {
    let params = render_params(syntax, substitution);
    if syntax.call_form() {
        format!("{}({params})", syntax.name())
    } else {
        format!("{} {params}", syntax.name()).trim_end().to_string()
    }
}

/// Raw parameter list used as a dedup key and as choice-list text.
///
/// Call form joins with an escaped comma so a signature stays a single
/// option inside a `${1|...|}` choice list; command form joins with a
/// space.
pub fn plain_signature(syntax: &ParsedSyntax) -> String {
    if syntax.call_form() {
        syntax.params().join("\\, ")
    } else {
        syntax.params().join(" ")
    }
}

/// Continuation dots leaking through from upstream markup get a fixed
/// human-readable label.
fn rewrite_continuation(rendered: &str) -> String {
    rendered.replace("${...}", "${etc}").replace("${…}", "${etc}")
}
