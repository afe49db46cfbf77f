//! Logger namespace validation

use super::error::{LoggerError, Result};
use std::fmt;

/// A validated, alphanumeric logger namespace.
///
/// The upper-cased form is what appears in formatted lines and what the
/// debug selector is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    original: String,
    upper: String,
}

impl Namespace {
    pub fn parse(namespace: &str) -> Result<Self> {
        let valid = !namespace.is_empty() && namespace.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            let (bad_char, reason) = if namespace.contains('-') {
                ("-", "hyphen")
            } else if namespace.contains(' ') {
                ("space", "space")
            } else {
                ("bad", "unknown")
            };

            return Err(LoggerError::InvalidNamespace {
                namespace: namespace.to_string(),
                bad_char,
                reason,
            });
        }

        Ok(Self {
            original: namespace.to_string(),
            upper: namespace.to_uppercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn upper(&self) -> &str {
        &self.upper
    }

    /// Whether `selector` names this namespace as a whole word, ignoring case.
    ///
    /// Words are maximal runs of `[A-Za-z0-9_]`, so `"db,wat"` selects `WAT`
    /// while `"watch"` and `"wat_x"` do not.
    pub fn is_selected_by(&self, selector: &str) -> bool {
        selector
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| word.eq_ignore_ascii_case(&self.upper))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_of(namespace: &str) -> (&'static str, &'static str) {
        match Namespace::parse(namespace) {
            Err(LoggerError::InvalidNamespace {
                bad_char, reason, ..
            }) => (bad_char, reason),
            other => panic!("expected InvalidNamespace, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_namespace_is_upper_cased() {
        let ns = Namespace::parse("svc42").unwrap();
        assert_eq!(ns.as_str(), "svc42");
        assert_eq!(ns.upper(), "SVC42");
        assert_eq!(ns.to_string(), "SVC42");
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(reason_of("bad-name"), ("-", "hyphen"));
        assert_eq!(reason_of("bad name"), ("space", "space"));
        assert_eq!(reason_of("bad#name"), ("bad", "unknown"));
        assert_eq!(reason_of(""), ("bad", "unknown"));
        // hyphen wins over space when both are present
        assert_eq!(reason_of("a b-c"), ("-", "hyphen"));
    }

    #[test]
    fn test_selector_matches_whole_words_only() {
        let ns = Namespace::parse("wat").unwrap();
        assert!(ns.is_selected_by("wat"));
        assert!(ns.is_selected_by("WAT"));
        assert!(ns.is_selected_by("http,wat net"));
        assert!(ns.is_selected_by("foo-wat"));
        assert!(!ns.is_selected_by("watch"));
        assert!(!ns.is_selected_by("wat_x"));
        assert!(!ns.is_selected_by(""));
    }
}
