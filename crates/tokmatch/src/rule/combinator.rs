//! Sequence, alternation, optional and repetition.

use super::eval::Evaluator;
use super::Rule;
use crate::error::{Error, Result};
use crate::matched::Match;
use crate::stream::TokenStream;

/// Occurrence bounds of a repetition. `max == None` is unbounded.
#[derive(Debug, Clone)]
pub(crate) struct Repeat {
    pub(crate) rule: Rule,
    pub(crate) min: usize,
    pub(crate) max: Option<usize>,
}

impl Repeat {
    pub(crate) fn new(rule: Rule, min: usize, max: Option<usize>) -> Result<Self> {
        if let Some(max) = max {
            if max < min {
                return Err(Error::InvalidArgument(format!(
                    "maximum occurrences {} is less than minimum {}",
                    max, min
                )));
            }
        }
        Ok(Self { rule, min, max })
    }
}

pub(crate) fn sequence<'t>(
    evaluator: &mut Evaluator<'_>,
    this: &Rule,
    rules: &[Rule],
    stream: &mut TokenStream<'t>,
) -> Result<Option<Match<'t>>> {
    let start = stream.position();
    for rule in rules {
        if evaluator.eval(rule, stream)?.is_none() {
            stream.restore(start);
            return Ok(None);
        }
    }
    Ok(Some(evaluator.span(this, stream, start)))
}

/// Members are tried in declaration order and the first match is returned.
pub(crate) fn any_of<'t>(
    evaluator: &mut Evaluator<'_>,
    rules: &[Rule],
    stream: &mut TokenStream<'t>,
) -> Result<Option<Match<'t>>> {
    for rule in rules {
        if let Some(m) = evaluator.eval(rule, stream)? {
            return Ok(Some(m));
        }
    }
    Ok(None)
}

pub(crate) fn optional<'t>(
    evaluator: &mut Evaluator<'_>,
    this: &Rule,
    rule: &Rule,
    stream: &mut TokenStream<'t>,
) -> Result<Option<Match<'t>>> {
    let start = stream.position();
    match evaluator.eval(rule, stream)? {
        Some(m) => Ok(Some(m)),
        None => Ok(Some(evaluator.span(this, stream, start))),
    }
}

pub(crate) fn repeat<'t>(
    evaluator: &mut Evaluator<'_>,
    this: &Rule,
    repeat: &Repeat,
    stream: &mut TokenStream<'t>,
) -> Result<Option<Match<'t>>> {
    let start = stream.position();
    let mut count = 0;
    while repeat.max.map_or(true, |max| count < max) {
        let Some(m) = evaluator.eval(&repeat.rule, stream)? else {
            break;
        };
        count += 1;
        if m.is_empty() {
            // Further iterations would match the same empty span forever.
            count = count.max(repeat.min);
            break;
        }
    }
    if count < repeat.min {
        stream.restore(start);
        return Ok(None);
    }
    Ok(Some(evaluator.span(this, stream, start)))
}
