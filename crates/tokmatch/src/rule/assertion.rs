//! Zero-width assertions. None of these consume tokens, whether they
//! succeed or not.

use super::eval::Evaluator;
use super::Rule;
use crate::error::Result;
use crate::stream::TokenStream;

/// Where an anchor looks for its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Only the two ends of the stream.
    Document,
    /// The ends of the stream plus every line-break token.
    Line,
}

/// Whether a lookaround requires its rule to match or to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Mode {
    Positive,
    Negative,
}

impl Mode {
    fn accepts(self, found: bool) -> bool {
        match self {
            Mode::Positive => found,
            Mode::Negative => !found,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Anchor {
    Start(Scope),
    End(Scope),
}

impl Anchor {
    pub(crate) fn holds(self, stream: &TokenStream<'_>) -> bool {
        match self {
            Anchor::Start(scope) => {
                stream.position() == 0
                    || (scope == Scope::Line
                        && stream.previous().is_some_and(|t| t.is_line_break()))
            }
            Anchor::End(scope) => {
                !stream.has_token()
                    || (scope == Scope::Line && stream.peek().is_some_and(|t| t.is_line_break()))
            }
        }
    }
}

/// Attempts `rule` at the cursor and puts the cursor back regardless of
/// the outcome.
pub(crate) fn lookahead(
    evaluator: &mut Evaluator<'_>,
    rule: &Rule,
    mode: Mode,
    stream: &mut TokenStream<'_>,
) -> Result<bool> {
    let position = stream.position();
    let found = evaluator.eval(rule, stream)?.is_some();
    stream.restore(position);
    Ok(mode.accepts(found))
}

/// Looks for a match of `rule` that ends exactly at the cursor by trying
/// every start position from the cursor back to the beginning.
pub(crate) fn lookbehind(
    evaluator: &mut Evaluator<'_>,
    rule: &Rule,
    mode: Mode,
    stream: &mut TokenStream<'_>,
) -> Result<bool> {
    let position = stream.position();
    let mut found = false;
    for start in (0..=position).rev() {
        stream.restore(start);
        let attempt = evaluator.eval(rule, stream);
        match attempt {
            Ok(Some(m)) if m.end() == position => {
                found = true;
                break;
            }
            Ok(_) => {}
            Err(e) => {
                stream.restore(position);
                return Err(e);
            }
        }
    }
    stream.restore(position);
    Ok(mode.accepts(found))
}
