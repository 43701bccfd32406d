//! Searching a token sequence for matches at any offset.

use crate::config::MatchConfig;
use crate::error::Result;
use crate::matched::Match;
use crate::rule::Rule;
use crate::stream::TokenStream;
use crate::token::Token;

/// Runs a rule at successive offsets of a token sequence.
///
/// Zero-width matches are skipped unless [`allow_empty`](Self::allow_empty)
/// is set.
///
/// # Example
///
/// ```
/// use tokmatch::{tokens, Rule, Scanner};
///
/// let number = Rule::pattern(r"\d+").unwrap().repeat_at_least(1);
/// let toks = tokens(["a", "1", "2", "b", "3"]);
/// let spans: Vec<_> = Scanner::new(&number)
///     .find_all(&toks)
///     .unwrap()
///     .iter()
///     .map(|m| m.range())
///     .collect();
/// assert_eq!(spans, vec![1..3, 4..5]);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'r> {
    rule: &'r Rule,
    config: MatchConfig,
    allow_empty: bool,
}

impl<'r> Scanner<'r> {
    pub fn new(rule: &'r Rule) -> Self {
        Self {
            rule,
            config: MatchConfig::default(),
            allow_empty: false,
        }
    }

    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// The leftmost match.
    pub fn find<'t>(&self, tokens: &'t [Token]) -> Result<Option<Match<'t>>> {
        self.find_at(tokens, 0)
    }

    /// The leftmost match starting at or after `start`.
    pub fn find_at<'t>(&self, tokens: &'t [Token], start: usize) -> Result<Option<Match<'t>>> {
        let mut stream = TokenStream::at(tokens, start)?;
        for offset in start..=tokens.len() {
            stream.seek(offset)?;
            if let Some(m) = self.attempt(&mut stream)? {
                return Ok(Some(m));
            }
        }
        Ok(None)
    }

    /// Non-overlapping matches from left to right.
    pub fn find_iter<'s, 't>(&'s self, tokens: &'t [Token]) -> FindIter<'s, 'r, 't> {
        FindIter {
            scanner: self,
            stream: TokenStream::new(tokens),
            next: Some(0),
        }
    }

    pub fn find_all<'t>(&self, tokens: &'t [Token]) -> Result<Vec<Match<'t>>> {
        self.find_iter(tokens).collect()
    }

    /// Whether the rule, applied at offset 0, consumes every token.
    pub fn is_full_match(&self, tokens: &[Token]) -> Result<bool> {
        let mut stream = TokenStream::new(tokens);
        let matched = self.rule.try_match_with(&mut stream, &self.config)?;
        Ok(matched.is_some_and(|m| m.end() == tokens.len()))
    }

    fn attempt<'t>(&self, stream: &mut TokenStream<'t>) -> Result<Option<Match<'t>>> {
        let start = stream.position();
        match self.rule.try_match_with(stream, &self.config)? {
            Some(m) if m.is_empty() && !self.allow_empty => {
                stream.seek(start)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

/// Iterator returned by [`Scanner::find_iter`]. Stops after the first error.
#[derive(Debug)]
pub struct FindIter<'s, 'r, 't> {
    scanner: &'s Scanner<'r>,
    stream: TokenStream<'t>,
    next: Option<usize>,
}

impl<'s, 'r, 't> Iterator for FindIter<'s, 'r, 't> {
    type Item = Result<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut offset = self.next?;
        while offset <= self.stream.len() {
            if let Err(e) = self.stream.seek(offset) {
                self.next = None;
                return Some(Err(e));
            }
            match self.scanner.attempt(&mut self.stream) {
                Ok(Some(m)) => {
                    // After an empty match, resume one token further on.
                    self.next = Some(if m.is_empty() { m.end() + 1 } else { m.end() });
                    return Some(Ok(m));
                }
                Ok(None) => offset += 1,
                Err(e) => {
                    self.next = None;
                    return Some(Err(e));
                }
            }
        }
        self.next = None;
        None
    }
}
