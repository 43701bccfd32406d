//! Parser for the rule notation.

use crate::NotationError;
use tokmatch::Scope;
use winnow::ascii::{digit1, multispace1};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_till, take_while};

// ============ AST Types ============

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(String),
    Pattern(String),
    Any,
    Length {
        min: usize,
        max: usize,
    },
    Start(Scope),
    End(Scope),
    Ref(String),
    Prefixed {
        op: PrefixOp,
        expr: Box<Expr>,
    },
    Quantified {
        expr: Box<Expr>,
        quantifier: Quantifier,
    },
    Sequence(Vec<Expr>),
    Alternation(Vec<Expr>),
    Boundary {
        start: Box<Expr>,
        middle: Option<Box<Expr>>,
        end: Box<Expr>,
    },
    Group(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Optional,
    AtLeast(usize),
    Exactly(usize),
    AtMost(usize),
    Between(usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub expr: Expr,
}

// ============ Parser ============

/// Skips whitespace and `#` comments.
fn skip(input: &mut &str) -> ModalResult<()> {
    repeat(
        0..,
        alt((
            multispace1.void(),
            ('#', take_till(0.., '\n')).void(),
        )),
    )
    .parse_next(input)
}

fn ws<'a, P, O>(p: P) -> impl Parser<&'a str, O, ContextError>
where
    P: Parser<&'a str, O, ContextError>,
{
    delimited(skip, p, skip)
}

fn number(input: &mut &str) -> ModalResult<usize> {
    digit1.try_map(str::parse::<usize>).parse_next(input)
}

fn unicode_escape(input: &mut &str) -> ModalResult<char> {
    delimited(
        '{',
        take_while(1..=6, |c: char| c.is_ascii_hexdigit()),
        '}',
    )
    .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
    .parse_next(input)
}

fn string_char(input: &mut &str) -> ModalResult<char> {
    let c: char = none_of('"').parse_next(input)?;
    if c != '\\' {
        return Ok(c);
    }
    let escaped: char = any.parse_next(input)?;
    match escaped {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '0' => Ok('\0'),
        'u' => cut_err(unicode_escape).parse_next(input),
        c => Ok(c),
    }
}

fn string_literal(input: &mut &str) -> ModalResult<Expr> {
    let text: String = delimited(
        '"',
        repeat(0.., string_char).fold(String::new, |mut s, c| {
            s.push(c);
            s
        }),
        '"',
    )
    .parse_next(input)?;
    Ok(Expr::Literal(text))
}

fn regex_literal(input: &mut &str) -> ModalResult<Expr> {
    '/'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let c: char = any.parse_next(input)?;
        if c == '/' {
            break;
        }
        if c == '\\' {
            let escaped: char = any.parse_next(input)?;
            if escaped != '/' {
                s.push('\\');
            }
            s.push(escaped);
        } else {
            s.push(c);
        }
    }
    Ok(Expr::Pattern(s))
}

fn ident(input: &mut &str) -> ModalResult<String> {
    let first: char = one_of(|c: char| c.is_ascii_alphabetic() || c == '_').parse_next(input)?;
    let rest: &str =
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    Ok(format!("{}{}", first, rest))
}

fn anchor(input: &mut &str) -> ModalResult<Expr> {
    alt((
        "^^".value(Expr::Start(Scope::Line)),
        "$$".value(Expr::End(Scope::Line)),
        "^".value(Expr::Start(Scope::Document)),
        "$".value(Expr::End(Scope::Document)),
    ))
    .parse_next(input)
}

fn length(input: &mut &str) -> ModalResult<Expr> {
    ("len", skip, '(').parse_next(input)?;
    let min = ws(number).parse_next(input)?;
    ','.parse_next(input)?;
    let max = ws(number).parse_next(input)?;
    ')'.parse_next(input)?;
    Ok(Expr::Length { min, max })
}

fn boundary(input: &mut &str) -> ModalResult<Expr> {
    ("between", skip, '(').parse_next(input)?;
    let mut parts: Vec<Expr> = separated(2..=3, ws(alternation), ',').parse_next(input)?;
    ')'.parse_next(input)?;
    let end = parts.pop();
    let middle = if parts.len() == 2 { parts.pop() } else { None };
    let start = parts.pop();
    match (start, end) {
        (Some(start), Some(end)) => Ok(Expr::Boundary {
            start: Box::new(start),
            middle: middle.map(Box::new),
            end: Box::new(end),
        }),
        _ => Err(ErrMode::Cut(ContextError::new())),
    }
}

fn atom(input: &mut &str) -> ModalResult<Expr> {
    alt((
        delimited(('(', skip), alternation, (skip, ')')),
        delimited(('[', skip), alternation, (skip, ']')).map(|e| Expr::Group(Box::new(e))),
        string_literal,
        regex_literal,
        '.'.value(Expr::Any),
        anchor,
        length,
        boundary,
        ident.map(Expr::Ref),
    ))
    .parse_next(input)
}

fn braced_quantifier(input: &mut &str) -> ModalResult<Quantifier> {
    '{'.parse_next(input)?;
    let min: Option<usize> = ws(opt(number)).parse_next(input)?;
    let upper: Option<Option<usize>> = opt(preceded(',', ws(opt(number)))).parse_next(input)?;
    '}'.parse_next(input)?;
    match (min, upper) {
        (Some(n), None) => Ok(Quantifier::Exactly(n)),
        (Some(n), Some(None)) => Ok(Quantifier::AtLeast(n)),
        (None, Some(Some(m))) => Ok(Quantifier::AtMost(m)),
        (Some(n), Some(Some(m))) => Ok(Quantifier::Between(n, m)),
        _ => Err(ErrMode::Cut(ContextError::new())),
    }
}

fn quantifier(input: &mut &str) -> ModalResult<Quantifier> {
    alt((
        '?'.value(Quantifier::Optional),
        '*'.value(Quantifier::AtLeast(0)),
        '+'.value(Quantifier::AtLeast(1)),
        braced_quantifier,
    ))
    .parse_next(input)
}

fn postfix(input: &mut &str) -> ModalResult<Expr> {
    let init = atom.parse_next(input)?;
    repeat(0.., quantifier)
        .fold(
            move || init.clone(),
            |acc, quantifier| Expr::Quantified {
                expr: Box::new(acc),
                quantifier,
            },
        )
        .parse_next(input)
}

fn prefix_op(input: &mut &str) -> ModalResult<PrefixOp> {
    alt((
        "<&".value(PrefixOp::Lookbehind),
        "<!".value(PrefixOp::NegativeLookbehind),
        '~'.value(PrefixOp::Not),
        '&'.value(PrefixOp::Lookahead),
        '!'.value(PrefixOp::NegativeLookahead),
    ))
    .parse_next(input)
}

fn prefixed(input: &mut &str) -> ModalResult<Expr> {
    let op: Option<PrefixOp> = opt(prefix_op).parse_next(input)?;
    match op {
        Some(op) => {
            skip.parse_next(input)?;
            let expr = prefixed.parse_next(input)?;
            Ok(Expr::Prefixed {
                op,
                expr: Box::new(expr),
            })
        }
        None => postfix(input),
    }
}

fn sequence(input: &mut &str) -> ModalResult<Expr> {
    let mut items: Vec<Expr> = repeat(1.., preceded(skip, prefixed)).parse_next(input)?;
    if items.len() == 1 {
        Ok(items.remove(0))
    } else {
        Ok(Expr::Sequence(items))
    }
}

fn alternation(input: &mut &str) -> ModalResult<Expr> {
    let mut items: Vec<Expr> = separated(1.., sequence, ws('|')).parse_next(input)?;
    if items.len() == 1 {
        Ok(items.remove(0))
    } else {
        Ok(Expr::Alternation(items))
    }
}

fn definition(input: &mut &str) -> ModalResult<Definition> {
    let name = ws(ident).parse_next(input)?;
    '='.parse_next(input)?;
    let expr = ws(alternation).parse_next(input)?;
    ';'.parse_next(input)?;
    Ok(Definition { name, expr })
}

fn finish<O>(
    source: &str,
    parser: impl FnOnce(&mut &str) -> ModalResult<O>,
) -> Result<O, NotationError> {
    let mut input = source;
    let result = parser(&mut input);
    let offset = source.len() - input.len();
    match result {
        Ok(value) => {
            let _ = skip.parse_next(&mut input);
            if input.is_empty() {
                Ok(value)
            } else {
                Err(NotationError::Parse {
                    offset: source.len() - input.len(),
                    message: format!("unexpected trailing input: {:?}", input),
                })
            }
        }
        Err(e) => Err(NotationError::Parse {
            offset,
            message: format!("{:?}", e),
        }),
    }
}

/// Parses a single rule expression.
pub fn parse_expr(source: &str) -> Result<Expr, NotationError> {
    finish(source, |input| ws(alternation).parse_next(input))
}

/// Parses a sequence of `name = expr;` definitions.
pub fn parse_definitions(source: &str) -> Result<Vec<Definition>, NotationError> {
    finish(source, |input| repeat(0.., definition).parse_next(input))
}
