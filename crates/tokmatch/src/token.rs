//! Tokens as handed over by an upstream lexer.

use std::fmt;

/// Source position of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// An immutable lexical unit.
///
/// The engine only looks at [`Token::value`] and, for groups, at
/// [`Token::children`]. The `kind` tag and the span are carried for the
/// consumer of the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    kind: String,
    span: Span,
    children: Option<Vec<Token>>,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            kind: kind.into(),
            span,
            children: None,
        }
    }

    /// A token with an empty kind and a default span, mostly useful in tests.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(value, "", Span::default())
    }

    /// Builds a token group. The group's value is the concatenation of its
    /// children's values and its span is the span of the first child.
    pub fn group(kind: impl Into<String>, children: Vec<Token>) -> Self {
        let value = children.iter().map(|c| c.value.as_str()).collect();
        let span = children.first().map(|c| c.span).unwrap_or_default();
        Self {
            value,
            kind: kind.into(),
            span,
            children: Some(children),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Child tokens if this token is a group.
    pub fn children(&self) -> Option<&[Token]> {
        self.children.as_deref()
    }

    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self.value.as_str(), "\n" | "\r\n" | "\r")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Convenience for tests and examples: one kind-less token per value.
pub fn tokens<I, S>(values: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Token::text).collect()
}
