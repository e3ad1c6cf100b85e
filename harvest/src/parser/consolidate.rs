//! Overload consolidation for elided syntax variants.
//!
//! Documentation pages often end their syntax listing with an elided
//! form such as `foo(A,B,___)`, meaning "any of the call shapes shown
//! above, plus more trailing arguments". The [`OverloadSet`] records
//! the full shapes of one page so the elided forms can substitute a
//! concrete parameter list or a tab-completion choice list.

use super::{ParsedSyntax, plain_signature, render_params};

/// The full (non-elided) call shapes seen so far on one page.
///
/// Must be scoped to a single page and fed in document order; sharing
/// one set across pages would cross-contaminate their overloads.
#[derive(Debug, Default)]
pub struct OverloadSet {
    fulls: Vec<FullOverload>,
    choices: Option<String>,
}

#[derive(Debug)]
struct FullOverload {
    plain: String,
    rendered_params: String,
}

impl OverloadSet {
    /// Creates an empty per-page set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a full syntax variant.
    ///
    /// A variant whose plain signature was already recorded is
    /// ignored, so equivalent call shapes contribute one choice.
    pub fn record(&mut self, syntax: &ParsedSyntax) {
        let plain = plain_signature(syntax);
        if self.fulls.iter().any(|full| full.plain == plain) {
            return;
        }
        self.fulls.push(FullOverload {
            plain,
            rendered_params: render_params(syntax, None),
        });
    }

    /// Resolves the elision marker against the shapes seen so far.
    ///
    /// Returns `None` when nothing was recorded yet; the marker cannot
    /// be resolved without at least one concrete prior overload. With
    /// exactly one prior the substitution is that shape's rendered
    /// parameter list; with more, a `${1|...|}` choice list over the
    /// recorded plain signatures.
    pub fn resolve_elision(&mut self) -> Option<String> {
        match self.fulls.len() {
            0 => None,
            1 => Some(self.fulls[0].rendered_params.clone()),
            _ => Some(self.choice_placeholder()),
        }
    }

    // Built once per page on first need and reused for every later
    // elided syntax.
    fn choice_placeholder(&mut self) -> String {
        if self.choices.is_none() {
            let options: Vec<&str> = self.fulls.iter().map(|full| full.plain.as_str()).collect();
            self.choices = Some(format!("${{1|{}|}}", options.join(",")));
        }
        self.choices.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_syntax;

    fn set_with(lines: &[&str]) -> OverloadSet {
        let mut overloads = OverloadSet::new();
        for line in lines {
            overloads.record(&parse_syntax(line, "foo"));
        }
        overloads
    }

    #[test]
    fn test_no_priors_is_unresolvable() {
        let mut overloads = OverloadSet::new();
        assert_eq!(overloads.resolve_elision(), None);
    }

    #[test]
    fn test_single_prior_substitutes_rendered_params() {
        let mut overloads = set_with(&["foo(A)"]);
        assert_eq!(overloads.resolve_elision().as_deref(), Some("${A}"));
    }

    #[test]
    fn test_multiple_priors_build_choice_list() {
        let mut overloads = set_with(&["foo(A)", "foo(A,B)"]);
        let choices = overloads.resolve_elision().unwrap();
        assert!(choices.starts_with("${1|"));
        assert!(choices.ends_with("|}"));
        assert!(choices.contains("A"));
        assert!(choices.contains("A\\, B"));
    }

    #[test]
    fn test_duplicate_plain_signatures_are_ignored() {
        let mut overloads = set_with(&["foo(A,B)", "[x,y] = foo(A,B)"]);
        // Both lines share the plain signature "A\, B".
        assert_eq!(overloads.resolve_elision().as_deref(), Some("${A}, ${B}"));
    }

    #[test]
    fn test_choice_list_is_cached_per_page() {
        let mut overloads = set_with(&["foo(A)", "foo(A,B)"]);
        let first = overloads.resolve_elision().unwrap();

        // Shapes recorded after the first resolution do not reopen the
        // already-built choice list.
        overloads.record(&parse_syntax("foo(A,B,C)", "foo"));
        let second = overloads.resolve_elision().unwrap();
        assert_eq!(first, second);
    }
}
