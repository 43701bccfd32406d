//! Single-token matchers: regex patterns, length bounds, and predicates.

use crate::error::{Error, Result};
use crate::token::Token;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Full-value match against one token: either exact text or a regular
/// expression that must cover the whole value.
#[derive(Debug, Clone)]
pub(crate) enum PatternRule {
    Literal(String),
    Regex { source: String, regex: Regex },
}

impl PatternRule {
    pub(crate) fn new(source: &str) -> Result<Self> {
        // Anchor the whole expression so `a|b` cannot match a prefix of "ab".
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self::Regex {
            source: source.to_string(),
            regex,
        })
    }

    pub(crate) fn literal(text: &str) -> Self {
        Self::Literal(text.to_string())
    }

    pub(crate) fn accepts(&self, token: &Token) -> bool {
        match self {
            Self::Literal(text) => token.value() == text,
            Self::Regex { regex, .. } => regex.is_match(token.value()),
        }
    }

    /// The expression text, escaped for literals.
    pub(crate) fn source(&self) -> String {
        match self {
            Self::Literal(text) => regex::escape(text),
            Self::Regex { source, .. } => source.clone(),
        }
    }

    pub(crate) fn literal_text(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::Regex { .. } => None,
        }
    }
}

/// Accepts a token whose value has between `min` and `max` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LengthRule {
    pub(crate) min: usize,
    pub(crate) max: usize,
}

impl LengthRule {
    pub(crate) fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidArgument(format!(
                "minimum length {} is greater than maximum length {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub(crate) fn accepts(&self, token: &Token) -> bool {
        let len = token.value().chars().count();
        self.min <= len && len <= self.max
    }
}

type Predicate = dyn Fn(&Token) -> bool + Send + Sync;

/// An arbitrary test over the current token.
#[derive(Clone)]
pub(crate) struct PredicateRule {
    name: String,
    test: Arc<Predicate>,
}

impl PredicateRule {
    pub(crate) fn new<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    pub(crate) fn accepts(&self, token: &Token) -> bool {
        (self.test)(token)
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PredicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_full_match() {
        let rule = PatternRule::new(r"\d+").unwrap();
        assert!(rule.accepts(&Token::text("123")));
        assert!(!rule.accepts(&Token::text("123abc")));
        assert!(!rule.accepts(&Token::text("abc123")));
    }

    #[test]
    fn test_alternation_inside_pattern_is_anchored() {
        let rule = PatternRule::new("a|b").unwrap();
        assert!(rule.accepts(&Token::text("a")));
        assert!(!rule.accepts(&Token::text("ab")));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            PatternRule::new("(unclosed"),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        let rule = PatternRule::literal("a.b");
        assert!(rule.accepts(&Token::text("a.b")));
        assert!(!rule.accepts(&Token::text("axb")));
        assert_eq!(rule.source(), r"a\.b");
        assert_eq!(rule.literal_text(), Some("a.b"));
    }

    #[test]
    fn test_length_bounds_inclusive() {
        let rule = LengthRule::new(2, 3).unwrap();
        assert!(!rule.accepts(&Token::text("a")));
        assert!(rule.accepts(&Token::text("ab")));
        assert!(rule.accepts(&Token::text("abc")));
        assert!(!rule.accepts(&Token::text("abcd")));
    }

    #[test]
    fn test_length_counts_characters() {
        let rule = LengthRule::new(2, 2).unwrap();
        assert!(rule.accepts(&Token::text("éé")));
    }

    #[test]
    fn test_length_min_greater_than_max() {
        assert!(matches!(
            LengthRule::new(3, 2),
            Err(Error::InvalidArgument(_))
        ));
        assert!(LengthRule::new(0, 0).is_ok());
    }

    #[test]
    fn test_predicate() {
        let rule = PredicateRule::new("upper", |t: &Token| {
            t.value().chars().all(|c| c.is_uppercase())
        });
        assert!(rule.accepts(&Token::text("ABC")));
        assert!(!rule.accepts(&Token::text("AbC")));
        assert_eq!(rule.name(), "upper");
    }
}
