//! A cursor over an immutable token sequence.

use crate::error::{Error, Result};
use crate::token::Token;

/// An immutable token sequence plus a single cursor in `[0, len]`.
///
/// `len` is a valid position: it is the exhausted state. A stream carries
/// exactly one cursor, so independent matches over the same tokens each
/// need their own stream.
#[derive(Debug, Clone)]
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    cursor: usize,
}

impl<'t> TokenStream<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// A stream positioned at `index`.
    pub fn at(tokens: &'t [Token], index: usize) -> Result<Self> {
        let mut stream = Self::new(tokens);
        stream.seek(index)?;
        Ok(stream)
    }

    pub fn has_token(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    pub fn current(&self) -> Result<&'t Token> {
        self.peek().ok_or(Error::OutOfRange {
            index: self.cursor,
            len: self.tokens.len(),
        })
    }

    /// The token at the cursor, or `None` once the stream is exhausted.
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.cursor)
    }

    /// The token just before the cursor.
    pub fn previous(&self) -> Option<&'t Token> {
        self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn consume(&mut self) -> Result<&'t Token> {
        let token = self.current()?;
        self.cursor += 1;
        Ok(token)
    }

    pub fn seek(&mut self, index: usize) -> Result<()> {
        if index > self.tokens.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.tokens.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    pub fn slice(&self, start: usize, end: usize) -> &'t [Token] {
        &self.tokens[start..end]
    }

    /// Moves the cursor back to a position previously read from
    /// [`position`](Self::position) on this stream.
    pub(crate) fn restore(&mut self, position: usize) {
        debug_assert!(position <= self.tokens.len());
        self.cursor = position;
    }

    /// Advances past the current token. Callers must have checked
    /// [`has_token`](Self::has_token).
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.has_token());
        self.cursor += 1;
    }
}
