//! Recursive-descent evaluation of a rule tree against a stream.
//!
//! Every function here follows the same discipline: on `Ok(None)` the
//! stream is back where it was when the function was called.

use super::lazy::LazyCell;
use super::{assertion, combinator, delimited, Rule, RuleKind};
use crate::config::MatchConfig;
use crate::error::{Error, Result};
use crate::matched::Match;
use crate::stream::TokenStream;
use crate::token::Token;
use std::collections::HashMap;
use tracing::trace;

/// Remaining stack below which evaluation switches to a fresh segment.
const RED_ZONE: usize = 128 * 1024;
/// Size of each stack segment allocated once the red zone is reached.
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

pub(crate) struct Evaluator<'c> {
    config: &'c MatchConfig,
    /// Lazy rules currently being evaluated, counted by the position they
    /// were entered at.
    active: HashMap<usize, usize>,
}

impl<'c> Evaluator<'c> {
    pub(crate) fn new(config: &'c MatchConfig) -> Self {
        Self {
            config,
            active: HashMap::new(),
        }
    }

    /// Evaluates `rule` at the cursor. Deep recursion continues on
    /// heap-allocated stack segments instead of exhausting the thread stack.
    pub(crate) fn eval<'t>(
        &mut self,
        rule: &Rule,
        stream: &mut TokenStream<'t>,
    ) -> Result<Option<Match<'t>>> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.dispatch(rule, stream))
    }

    fn dispatch<'t>(
        &mut self,
        rule: &Rule,
        stream: &mut TokenStream<'t>,
    ) -> Result<Option<Match<'t>>> {
        let start = stream.position();
        let result = match rule.kind() {
            RuleKind::Any => self.single(rule, stream, |_| true),
            RuleKind::Pattern(pattern) => self.single(rule, stream, |t| pattern.accepts(t)),
            RuleKind::Length(length) => self.single(rule, stream, |t| length.accepts(t)),
            RuleKind::Predicate(predicate) => self.single(rule, stream, |t| predicate.accepts(t)),
            RuleKind::Not(inner) => self.negate(rule, inner, stream)?,
            RuleKind::Anchor(anchor) => {
                self.zero_width(rule, stream, anchor.holds(stream))
            }
            RuleKind::Lookahead { rule: inner, mode } => {
                let holds = assertion::lookahead(self, inner, *mode, stream)?;
                self.zero_width(rule, stream, holds)
            }
            RuleKind::Lookbehind { rule: inner, mode } => {
                let holds = assertion::lookbehind(self, inner, *mode, stream)?;
                self.zero_width(rule, stream, holds)
            }
            RuleKind::Sequence(rules) => combinator::sequence(self, rule, rules, stream)?,
            RuleKind::AnyOf(rules) => combinator::any_of(self, rules, stream)?,
            RuleKind::Optional(inner) => combinator::optional(self, rule, inner, stream)?,
            RuleKind::Repeat(repeat) => combinator::repeat(self, rule, repeat, stream)?,
            RuleKind::Boundary(boundary) => delimited::boundary(self, rule, boundary, stream)?,
            RuleKind::Group(inner) => delimited::group(self, rule, inner, stream)?,
            RuleKind::Lazy(cell) => self.dereference(cell, stream)?,
        };
        trace!(
            rule = rule.kind_name(),
            start,
            end = stream.position(),
            matched = result.is_some(),
            "rule attempt"
        );
        Ok(result)
    }

    /// The match from `start` to the current cursor.
    pub(crate) fn span<'t>(&self, rule: &Rule, stream: &TokenStream<'t>, start: usize) -> Match<'t> {
        let end = stream.position();
        Match::new(start, end, stream.slice(start, end), rule.clone())
    }

    fn single<'t, F>(&self, rule: &Rule, stream: &mut TokenStream<'t>, accepts: F) -> Option<Match<'t>>
    where
        F: Fn(&Token) -> bool,
    {
        let token = stream.peek()?;
        if !accepts(token) {
            return None;
        }
        let start = stream.position();
        stream.advance();
        Some(self.span(rule, stream, start))
    }

    fn zero_width<'t>(&self, rule: &Rule, stream: &TokenStream<'t>, holds: bool) -> Option<Match<'t>> {
        holds.then(|| self.span(rule, stream, stream.position()))
    }

    /// Consumes one token if `inner` does not match at the cursor.
    fn negate<'t>(
        &mut self,
        rule: &Rule,
        inner: &Rule,
        stream: &mut TokenStream<'t>,
    ) -> Result<Option<Match<'t>>> {
        if !stream.has_token() {
            return Ok(None);
        }
        let start = stream.position();
        let inner_matched = self.eval(inner, stream)?.is_some();
        stream.restore(start);
        if inner_matched {
            return Ok(None);
        }
        stream.advance();
        Ok(Some(self.span(rule, stream, start)))
    }

    /// Evaluates the target of a lazy rule. Only nesting that makes no
    /// progress counts toward the depth limit: recursion that consumes
    /// tokens between entries is bounded by the input length.
    fn dereference<'t>(
        &mut self,
        cell: &LazyCell,
        stream: &mut TokenStream<'t>,
    ) -> Result<Option<Match<'t>>> {
        let Some(target) = cell.target() else {
            return Ok(None);
        };
        let position = stream.position();
        let entered = self.active.get(&position).copied().unwrap_or(0);
        if let Some(limit) = self.config.depth_limit() {
            if entered >= limit {
                return Err(Error::DepthLimitExceeded { limit });
            }
        }
        self.active.insert(position, entered + 1);
        let result = self.eval(target, stream);
        if entered == 0 {
            self.active.remove(&position);
        } else {
            self.active.insert(position, entered);
        }
        result
    }
}
