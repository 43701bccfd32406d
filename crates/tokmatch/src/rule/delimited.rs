//! Delimited spans and delegation into token groups.

use super::eval::Evaluator;
use super::Rule;
use crate::error::{Error, Result};
use crate::matched::Match;
use crate::stream::TokenStream;

/// `start`, then any number of `middle` units, then `end`. The end rule is
/// checked before each middle unit, so the first `end` closes the span.
#[derive(Debug, Clone)]
pub(crate) struct Boundary {
    pub(crate) start: Rule,
    pub(crate) middle: Rule,
    pub(crate) end: Rule,
}

impl Boundary {
    pub(crate) fn new(start: Rule, middle: Option<Rule>, end: Rule) -> Result<Self> {
        let middle = middle.unwrap_or_else(Rule::any);
        if !middle.can_consume() {
            return Err(Error::InvalidArgument(format!(
                "boundary middle rule `{}` can never consume a token",
                middle
            )));
        }
        Ok(Self { start, middle, end })
    }
}

pub(crate) fn boundary<'t>(
    evaluator: &mut Evaluator<'_>,
    this: &Rule,
    boundary: &Boundary,
    stream: &mut TokenStream<'t>,
) -> Result<Option<Match<'t>>> {
    let start = stream.position();
    if evaluator.eval(&boundary.start, stream)?.is_none() {
        return Ok(None);
    }
    loop {
        if evaluator.eval(&boundary.end, stream)?.is_some() {
            return Ok(Some(evaluator.span(this, stream, start)));
        }
        if !stream.has_token() {
            break;
        }
        // A zero-width middle unit cannot make progress.
        match evaluator.eval(&boundary.middle, stream)? {
            Some(m) if !m.is_empty() => {}
            _ => break,
        }
    }
    stream.restore(start);
    Ok(None)
}

/// Runs `rule` over the children of the current group token. The inner
/// match must cover every child; the outer stream advances by one token.
pub(crate) fn group<'t>(
    evaluator: &mut Evaluator<'_>,
    this: &Rule,
    rule: &Rule,
    stream: &mut TokenStream<'t>,
) -> Result<Option<Match<'t>>> {
    let Some(children) = stream.peek().and_then(|t| t.children()) else {
        return Ok(None);
    };
    let mut inner = TokenStream::new(children);
    let covered = match evaluator.eval(rule, &mut inner)? {
        Some(m) => m.end() == children.len(),
        None => false,
    };
    if !covered {
        return Ok(None);
    }
    let start = stream.position();
    stream.advance();
    Ok(Some(evaluator.span(this, stream, start)))
}

#[cfg(test)]
mod tests {
    use crate::rule::Rule;
    use crate::stream::TokenStream;
    use crate::token::{tokens, Token};
    use crate::{Error, Scope};

    fn parens(middle: Option<Rule>) -> Rule {
        Rule::boundary(Rule::literal("("), middle, Rule::literal(")")).unwrap()
    }

    #[test]
    fn test_boundary_spans() {
        let rule = parens(Some(Rule::literal("test")));

        let toks = tokens(["(", ")"]);
        let mut stream = TokenStream::new(&toks);
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 0..2);

        let toks = tokens(["(", "test", ")"]);
        let mut stream = TokenStream::new(&toks);
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 0..3);

        let toks = tokens(["(", "test"]);
        let mut stream = TokenStream::new(&toks);
        assert!(rule.try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_boundary_middle_mismatch() {
        let rule = parens(Some(Rule::literal("test")));
        let toks = tokens(["(", "other", ")"]);
        let mut stream = TokenStream::new(&toks);
        assert!(rule.try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_boundary_default_middle_stops_at_first_end() {
        let rule = parens(None);
        let toks = tokens(["(", "a", "b", ")", "c", ")"]);
        let mut stream = TokenStream::new(&toks);
        let m = rule.try_match(&mut stream).unwrap().unwrap();
        assert_eq!(m.range(), 0..4);
        assert_eq!(m.text(), "(ab)");
    }

    #[test]
    fn test_boundary_with_composite_middle() {
        let middle = Rule::any_of([Rule::literal("a"), Rule::literal("b")])
            .unwrap()
            .repeat_at_least(1);
        let rule = parens(Some(middle));
        let toks = tokens(["(", "a", "b", "a", ")"]);
        let mut stream = TokenStream::new(&toks);
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 0..5);
    }

    #[test]
    fn test_boundary_with_end_anchor_as_end() {
        let rule = Rule::boundary(Rule::literal("#"), None, Rule::end(Scope::Line)).unwrap();
        let toks = tokens(["#", "comment", "text", "\n", "next"]);
        let mut stream = TokenStream::new(&toks);
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 0..3);
    }

    #[test]
    fn test_boundary_rejects_zero_width_middle() {
        let result = Rule::boundary(
            Rule::literal("("),
            Some(Rule::end(Scope::Document)),
            Rule::literal(")"),
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let result = Rule::boundary(
            Rule::literal("("),
            Some(Rule::literal("x").lookahead().optional()),
            Rule::literal(")"),
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_boundary_optional_middle_cannot_stall() {
        let rule = parens(Some(Rule::literal("x").optional()));
        let toks = tokens(["(", "y", ")"]);
        let mut stream = TokenStream::new(&toks);
        assert!(rule.try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 0);
    }

    fn hello_world() -> Rule {
        Rule::sequence([
            Rule::pattern("hello").unwrap(),
            Rule::pattern("world").unwrap(),
        ])
        .unwrap()
        .group()
    }

    #[test]
    fn test_group_matches_all_children() {
        let rule = hello_world();
        let toks = vec![Token::group("phrase", tokens(["hello", "world"])), Token::text("!")];
        let mut stream = TokenStream::new(&toks);
        let m = rule.try_match(&mut stream).unwrap().unwrap();
        assert_eq!(m.range(), 0..1);
        assert_eq!(m.text(), "helloworld");
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn test_group_rejects_leftover_children() {
        let rule = hello_world();
        let toks = vec![Token::group("phrase", tokens(["hello", "world", "again"]))];
        let mut stream = TokenStream::new(&toks);
        assert!(rule.try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_group_rejects_plain_token() {
        let rule = hello_world();
        let toks = tokens(["helloworld"]);
        let mut stream = TokenStream::new(&toks);
        assert!(rule.try_match(&mut stream).unwrap().is_none());
    }

    #[test]
    fn test_group_of_empty_children() {
        let rule = Rule::literal("x").repeat_infinitely().group();
        let toks = vec![Token::group("empty", Vec::new())];
        let mut stream = TokenStream::new(&toks);
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 0..1);
    }

    #[test]
    fn test_nested_groups() {
        let inner = Rule::literal("b").group();
        let rule = Rule::sequence([Rule::literal("a"), inner]).unwrap().group();
        let toks = vec![Token::group(
            "outer",
            vec![Token::text("a"), Token::group("inner", tokens(["b"]))],
        )];
        let mut stream = TokenStream::new(&toks);
        assert!(rule.try_match(&mut stream).unwrap().is_some());
    }
}
