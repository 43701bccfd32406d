use crate::rule::Rule;
use crate::token::Token;
use std::ops::Range;

/// A successful match: the half-open span `[start, end)` of the stream and
/// the tokens inside it.
///
/// `tokens` always borrows exactly that slice of the stream, so
/// `end - start == tokens.len()`. Zero-width matches have `start == end`.
#[derive(Debug, Clone)]
pub struct Match<'t> {
    start: usize,
    end: usize,
    tokens: &'t [Token],
    rule: Rule,
}

impl<'t> Match<'t> {
    pub(crate) fn new(start: usize, end: usize, tokens: &'t [Token], rule: Rule) -> Self {
        debug_assert_eq!(end - start, tokens.len());
        Self {
            start,
            end,
            tokens,
            rule,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    /// The rule that produced this match.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The matched token values joined together.
    pub fn text(&self) -> String {
        self.tokens.iter().map(Token::value).collect()
    }

    pub fn values(&self) -> Vec<&'t str> {
        self.tokens.iter().map(Token::value).collect()
    }
}
