//! The rule tree and its builder API.

mod assertion;
mod combinator;
mod delimited;
mod eval;
mod lazy;
mod leaf;

pub use assertion::Scope;

use crate::config::MatchConfig;
use crate::error::{Error, Result};
use crate::matched::Match;
use crate::stream::TokenStream;
use crate::token::Token;
use assertion::{Anchor, Mode};
use combinator::Repeat;
use delimited::Boundary;
use eval::Evaluator;
use lazy::LazyCell;
use leaf::{LengthRule, PatternRule, PredicateRule};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

static ANY: Lazy<Rule> = Lazy::new(|| Rule::from_kind(RuleKind::Any));
static DOCUMENT_START: Lazy<Rule> =
    Lazy::new(|| Rule::from_kind(RuleKind::Anchor(Anchor::Start(Scope::Document))));
static DOCUMENT_END: Lazy<Rule> =
    Lazy::new(|| Rule::from_kind(RuleKind::Anchor(Anchor::End(Scope::Document))));
static LINE_START: Lazy<Rule> =
    Lazy::new(|| Rule::from_kind(RuleKind::Anchor(Anchor::Start(Scope::Line))));
static LINE_END: Lazy<Rule> =
    Lazy::new(|| Rule::from_kind(RuleKind::Anchor(Anchor::End(Scope::Line))));

#[derive(Debug)]
pub(crate) enum RuleKind {
    Any,
    Pattern(PatternRule),
    Length(LengthRule),
    Predicate(PredicateRule),
    Not(Rule),
    Anchor(Anchor),
    Lookahead { rule: Rule, mode: Mode },
    Lookbehind { rule: Rule, mode: Mode },
    Sequence(Vec<Rule>),
    AnyOf(Vec<Rule>),
    Optional(Rule),
    Repeat(Repeat),
    Boundary(Boundary),
    Group(Rule),
    Lazy(LazyCell),
}

/// An immutable, shareable matching strategy.
///
/// Rules are built once and applied many times. Cloning a rule is cheap and
/// yields a handle to the same tree. The only state a rule ever changes is
/// the one-time assignment of a [`Rule::lazy`] reference.
///
/// # Example
///
/// ```
/// use tokmatch::{tokens, Rule, TokenStream};
///
/// let number = Rule::pattern(r"\d+").unwrap();
/// let list = Rule::sequence([
///     number.clone(),
///     Rule::sequence([Rule::literal(","), number]).unwrap().repeat_infinitely(),
/// ])
/// .unwrap();
///
/// let toks = tokens(["1", ",", "2", ",", "3", ";"]);
/// let mut stream = TokenStream::new(&toks);
/// let m = list.try_match(&mut stream).unwrap().unwrap();
/// assert_eq!(m.range(), 0..5);
/// ```
#[derive(Clone)]
pub struct Rule(Arc<RuleKind>);

impl Rule {
    fn from_kind(kind: RuleKind) -> Self {
        Rule(Arc::new(kind))
    }

    pub(crate) fn kind(&self) -> &RuleKind {
        &self.0
    }

    // ============ Leaf rules ============

    /// Matches any single token.
    pub fn any() -> Rule {
        ANY.clone()
    }

    /// Matches a token whose value is exactly `text`.
    pub fn literal(text: impl AsRef<str>) -> Rule {
        Self::from_kind(RuleKind::Pattern(PatternRule::literal(text.as_ref())))
    }

    /// Matches a token whose entire value matches the regular expression.
    pub fn pattern(regex: impl AsRef<str>) -> Result<Rule> {
        Ok(Self::from_kind(RuleKind::Pattern(PatternRule::new(
            regex.as_ref(),
        )?)))
    }

    /// Matches a token whose value has `min..=max` characters.
    pub fn length(min: usize, max: usize) -> Result<Rule> {
        Ok(Self::from_kind(RuleKind::Length(LengthRule::new(min, max)?)))
    }

    /// Matches a token accepted by `test`. The name is used for display.
    pub fn predicate<F>(name: impl Into<String>, test: F) -> Rule
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        Self::from_kind(RuleKind::Predicate(PredicateRule::new(name, test)))
    }

    // ============ Assertions ============

    pub fn start(scope: Scope) -> Rule {
        match scope {
            Scope::Document => DOCUMENT_START.clone(),
            Scope::Line => LINE_START.clone(),
        }
    }

    pub fn end(scope: Scope) -> Rule {
        match scope {
            Scope::Document => DOCUMENT_END.clone(),
            Scope::Line => LINE_END.clone(),
        }
    }

    pub fn lookahead(&self) -> Rule {
        self.lookaround(Mode::Positive, false)
    }

    pub fn negative_lookahead(&self) -> Rule {
        self.lookaround(Mode::Negative, false)
    }

    /// Succeeds if this rule matches a span ending at the cursor.
    pub fn lookbehind(&self) -> Rule {
        self.lookaround(Mode::Positive, true)
    }

    pub fn negative_lookbehind(&self) -> Rule {
        self.lookaround(Mode::Negative, true)
    }

    fn lookaround(&self, mode: Mode, behind: bool) -> Rule {
        let rule = self.clone();
        if behind {
            Self::from_kind(RuleKind::Lookbehind { rule, mode })
        } else {
            Self::from_kind(RuleKind::Lookahead { rule, mode })
        }
    }

    /// Inverts a single-token rule: the result consumes one token that this
    /// rule would not match. Negating a negation gives back the original
    /// rule handle.
    pub fn not(&self) -> Result<Rule> {
        match self.kind() {
            RuleKind::Not(inner) => Ok(inner.clone()),
            RuleKind::Pattern(_) | RuleKind::Length(_) | RuleKind::Predicate(_) => {
                Ok(Self::from_kind(RuleKind::Not(self.clone())))
            }
            _ => Err(Error::NotInvertible(self.kind_name())),
        }
    }

    // ============ Combinators ============

    /// Matches each rule in order, each starting where the previous ended.
    pub fn sequence(rules: impl IntoIterator<Item = Rule>) -> Result<Rule> {
        let rules: Vec<Rule> = rules.into_iter().collect();
        if rules.is_empty() {
            return Err(Error::MissingRule("sequence needs at least one rule"));
        }
        Ok(Self::from_kind(RuleKind::Sequence(rules)))
    }

    /// Matches the first of `rules` that matches at the cursor.
    pub fn any_of(rules: impl IntoIterator<Item = Rule>) -> Result<Rule> {
        let rules: Vec<Rule> = rules.into_iter().collect();
        if rules.is_empty() {
            return Err(Error::MissingRule("alternation needs at least one rule"));
        }
        Ok(Self::from_kind(RuleKind::AnyOf(rules)))
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: Rule) -> Rule {
        Self::from_kind(RuleKind::Sequence(vec![self.clone(), next]))
    }

    /// `self`, or `other` if `self` does not match.
    pub fn or(&self, other: Rule) -> Rule {
        Self::from_kind(RuleKind::AnyOf(vec![self.clone(), other]))
    }

    pub fn optional(&self) -> Rule {
        Self::from_kind(RuleKind::Optional(self.clone()))
    }

    pub fn repeat_at_least(&self, min: usize) -> Rule {
        Self::from_kind(RuleKind::Repeat(Repeat {
            rule: self.clone(),
            min,
            max: None,
        }))
    }

    pub fn repeat_infinitely(&self) -> Rule {
        self.repeat_at_least(0)
    }

    pub fn repeat_exactly(&self, count: usize) -> Result<Rule> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "exact repetition count must be positive".to_string(),
            ));
        }
        self.repeat_between(count, count)
    }

    pub fn repeat_at_most(&self, count: usize) -> Result<Rule> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "maximum repetition count must be positive".to_string(),
            ));
        }
        self.repeat_between(0, count)
    }

    pub fn repeat_between(&self, min: usize, max: usize) -> Result<Rule> {
        let repeat = Repeat::new(self.clone(), min, Some(max))?;
        Ok(Self::from_kind(RuleKind::Repeat(repeat)))
    }

    /// A span opened by `start` and closed by the first `end` that follows.
    /// Between them, `middle` (default: any token) must consume at least one
    /// token per step.
    pub fn boundary(start: Rule, middle: Option<Rule>, end: Rule) -> Result<Rule> {
        Ok(Self::from_kind(RuleKind::Boundary(Boundary::new(
            start, middle, end,
        )?)))
    }

    /// Matches one group token whose children this rule matches entirely.
    pub fn group(&self) -> Rule {
        Self::from_kind(RuleKind::Group(self.clone()))
    }

    // ============ Lazy references ============

    /// A forward reference, to be assigned once with [`Rule::set`].
    ///
    /// ```
    /// use tokmatch::{tokens, Rule, TokenStream};
    ///
    /// // list := "[" list* "]"
    /// let list = Rule::named_lazy("list");
    /// list.set(
    ///     Rule::sequence([Rule::literal("["), list.repeat_infinitely(), Rule::literal("]")])
    ///         .unwrap(),
    /// )
    /// .unwrap();
    ///
    /// let toks = tokens(["[", "[", "]", "]"]);
    /// assert!(list.try_match(&mut TokenStream::new(&toks)).unwrap().is_some());
    /// ```
    pub fn lazy() -> Rule {
        Self::from_kind(RuleKind::Lazy(LazyCell::new(None)))
    }

    pub fn named_lazy(name: impl Into<String>) -> Rule {
        Self::from_kind(RuleKind::Lazy(LazyCell::new(Some(name.into()))))
    }

    /// Assigns the target of a lazy rule. Fails if this rule is not lazy or
    /// was already assigned.
    pub fn set(&self, target: Rule) -> Result<()> {
        match self.kind() {
            RuleKind::Lazy(cell) => cell.set(target),
            _ => Err(Error::InvalidArgument(format!(
                "cannot assign a target to a {} rule",
                self.kind_name()
            ))),
        }
    }

    /// The target of a lazy rule.
    pub fn get(&self) -> Result<&Rule> {
        match self.kind() {
            RuleKind::Lazy(cell) => cell.get(),
            _ => Err(Error::InvalidArgument(format!(
                "{} rules have no target",
                self.kind_name()
            ))),
        }
    }

    // ============ Matching ============

    /// Attempts a match at the stream's cursor with [`MatchConfig::default`].
    ///
    /// On success the cursor is left after the match. On `Ok(None)` or an
    /// error the cursor is unchanged. The only error is
    /// [`Error::DepthLimitExceeded`], raised when a grammar recurses
    /// without consuming tokens.
    pub fn try_match<'t>(&self, stream: &mut TokenStream<'t>) -> Result<Option<Match<'t>>> {
        self.try_match_with(stream, &MatchConfig::default())
    }

    /// Like [`try_match`](Self::try_match) but with explicit settings.
    pub fn try_match_with<'t>(
        &self,
        stream: &mut TokenStream<'t>,
        config: &MatchConfig,
    ) -> Result<Option<Match<'t>>> {
        let start = stream.position();
        let result = Evaluator::new(config).eval(self, stream);
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => stream.restore(start),
            Err(e) => {
                warn!(rule = %self, position = start, "{}", e);
                stream.restore(start);
            }
        }
        result
    }

    // ============ Introspection ============

    /// Whether two handles point at the same rule.
    pub fn ptr_eq(&self, other: &Rule) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this rule is able to consume at least one token. Rules for
    /// which this is false only ever produce zero-width matches. Lazy
    /// references are assumed to consume.
    pub fn can_consume(&self) -> bool {
        match self.kind() {
            RuleKind::Any
            | RuleKind::Pattern(_)
            | RuleKind::Length(_)
            | RuleKind::Predicate(_)
            | RuleKind::Not(_)
            | RuleKind::Group(_)
            | RuleKind::Boundary(_)
            | RuleKind::Lazy(_) => true,
            RuleKind::Anchor(_) | RuleKind::Lookahead { .. } | RuleKind::Lookbehind { .. } => {
                false
            }
            RuleKind::Sequence(rules) | RuleKind::AnyOf(rules) => {
                rules.iter().any(Rule::can_consume)
            }
            RuleKind::Optional(rule) => rule.can_consume(),
            RuleKind::Repeat(repeat) => repeat.max != Some(0) && repeat.rule.can_consume(),
        }
    }

    /// Anchors, lookarounds and composites made only of them.
    pub fn is_zero_width(&self) -> bool {
        !self.can_consume()
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            RuleKind::Any => "any",
            RuleKind::Pattern(p) if p.literal_text().is_some() => "literal",
            RuleKind::Pattern(_) => "pattern",
            RuleKind::Length(_) => "length",
            RuleKind::Predicate(_) => "predicate",
            RuleKind::Not(_) => "not",
            RuleKind::Anchor(Anchor::Start(_)) => "start",
            RuleKind::Anchor(Anchor::End(_)) => "end",
            RuleKind::Lookahead { .. } => "lookahead",
            RuleKind::Lookbehind { .. } => "lookbehind",
            RuleKind::Sequence(_) => "sequence",
            RuleKind::AnyOf(_) => "any-of",
            RuleKind::Optional(_) => "optional",
            RuleKind::Repeat(_) => "repeat",
            RuleKind::Boundary(_) => "boundary",
            RuleKind::Group(_) => "group",
            RuleKind::Lazy(_) => "lazy",
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, rules: &[Rule], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, rule) in rules.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", rule)?;
    }
    f.write_str(")")
}

/// Quotes literal text using only the escapes the notation reads back:
/// `\\`, `\"`, `\n`, `\t`, `\r`, and `\u{..}` for other control characters.
fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c.is_control() => write!(f, "\\u{{{:x}}}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Writes the operand of a postfix operator, parenthesizing prefix forms
/// so the rendering keeps its precedence.
fn write_operand(f: &mut fmt::Formatter<'_>, rule: &Rule) -> fmt::Result {
    match rule.kind() {
        RuleKind::Not(_) | RuleKind::Lookahead { .. } | RuleKind::Lookbehind { .. } => {
            write!(f, "({})", rule)
        }
        _ => write!(f, "{}", rule),
    }
}

/// Renders the rule in the textual notation understood by
/// `tokmatch-notation`. Predicates render as `<name>`, which that notation
/// cannot read back.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            RuleKind::Any => f.write_str("."),
            RuleKind::Pattern(p) => match p.literal_text() {
                Some(text) => write_quoted(f, text),
                None => write!(f, "/{}/", p.source().replace('/', "\\/")),
            },
            RuleKind::Length(l) => write!(f, "len({}, {})", l.min, l.max),
            RuleKind::Predicate(p) => write!(f, "<{}>", p.name()),
            RuleKind::Not(inner) => write!(f, "~{}", inner),
            RuleKind::Anchor(anchor) => f.write_str(match anchor {
                Anchor::Start(Scope::Document) => "^",
                Anchor::End(Scope::Document) => "$",
                Anchor::Start(Scope::Line) => "^^",
                Anchor::End(Scope::Line) => "$$",
            }),
            RuleKind::Lookahead { rule, mode } => match mode {
                Mode::Positive => write!(f, "&{}", rule),
                Mode::Negative => write!(f, "!{}", rule),
            },
            RuleKind::Lookbehind { rule, mode } => match mode {
                Mode::Positive => write!(f, "<&{}", rule),
                Mode::Negative => write!(f, "<!{}", rule),
            },
            RuleKind::Sequence(rules) => write_list(f, rules, " "),
            RuleKind::AnyOf(rules) => write_list(f, rules, " | "),
            RuleKind::Optional(rule) => {
                write_operand(f, rule)?;
                f.write_str("?")
            }
            RuleKind::Repeat(Repeat { rule, min, max }) => {
                write_operand(f, rule)?;
                match (min, max) {
                    (0, None) => f.write_str("*"),
                    (1, None) => f.write_str("+"),
                    (min, None) => write!(f, "{{{},}}", min),
                    (0, Some(max)) => write!(f, "{{,{}}}", max),
                    (min, Some(max)) if min == max => write!(f, "{{{}}}", min),
                    (min, Some(max)) => write!(f, "{{{},{}}}", min, max),
                }
            }
            RuleKind::Boundary(b) => {
                write!(f, "between({}, {}, {})", b.start, b.middle, b.end)
            }
            RuleKind::Group(rule) => write!(f, "[{}]", rule),
            RuleKind::Lazy(cell) => f.write_str(cell.name().unwrap_or("lazy")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_DEPTH;
    use crate::token::tokens;

    #[test]
    fn test_any_consumes_one_token() {
        let toks = tokens(["a", "b"]);
        let mut stream = TokenStream::new(&toks);
        let m = Rule::any().try_match(&mut stream).unwrap().unwrap();
        assert_eq!(m.range(), 0..1);
        assert_eq!(m.values(), vec!["a"]);

        stream.seek(2).unwrap();
        assert!(Rule::any().try_match(&mut stream).unwrap().is_none());
    }

    #[test]
    fn test_singletons_are_shared() {
        assert!(Rule::any().ptr_eq(&Rule::any()));
        assert!(Rule::start(Scope::Document).ptr_eq(&Rule::start(Scope::Document)));
        assert!(!Rule::start(Scope::Line).ptr_eq(&Rule::start(Scope::Document)));
        assert!(!Rule::literal("a").ptr_eq(&Rule::literal("a")));
    }

    #[test]
    fn test_not_consumes_one_token() {
        let rule = Rule::literal("a").not().unwrap();
        let toks = tokens(["b", "a"]);
        let mut stream = TokenStream::new(&toks);
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 0..1);
        assert!(rule.try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn test_not_on_exhausted_stream() {
        let rule = Rule::literal("a").not().unwrap();
        let toks = tokens(["a"]);
        let mut stream = TokenStream::at(&toks, 1).unwrap();
        assert!(rule.try_match(&mut stream).unwrap().is_none());
    }

    #[test]
    fn test_double_negation_is_identity() {
        let rule = Rule::pattern("[a-z]+").unwrap();
        let twice = rule.not().unwrap().not().unwrap();
        assert!(twice.ptr_eq(&rule));

        let length = Rule::length(1, 2).unwrap();
        assert!(length.not().unwrap().not().unwrap().ptr_eq(&length));
    }

    #[test]
    fn test_not_rejects_composites() {
        let seq = Rule::sequence([Rule::literal("a")]).unwrap();
        assert_eq!(seq.not().unwrap_err(), Error::NotInvertible("sequence"));
        assert!(Rule::any().not().is_err());
        assert!(Rule::start(Scope::Line).not().is_err());
    }

    #[test]
    fn test_predicate_rule() {
        let upper = Rule::predicate("upper", |t: &Token| {
            t.value().chars().all(char::is_uppercase)
        });
        let toks = tokens(["ABC", "abc"]);
        let mut stream = TokenStream::new(&toks);
        assert!(upper.try_match(&mut stream).unwrap().is_some());
        assert!(upper.try_match(&mut stream).unwrap().is_none());
        assert!(upper.not().unwrap().try_match(&mut stream).unwrap().is_some());
    }

    #[test]
    fn test_length_rule() {
        let rule = Rule::length(2, 3).unwrap();
        let toks = tokens(["abcd"]);
        assert!(rule.try_match(&mut TokenStream::new(&toks)).unwrap().is_none());
        assert!(Rule::length(3, 1).is_err());
    }

    #[test]
    fn test_lookahead_does_not_move() {
        let toks = tokens(["a", "b"]);
        let mut stream = TokenStream::new(&toks);

        let m = Rule::literal("a").lookahead().try_match(&mut stream).unwrap().unwrap();
        assert!(m.is_empty());
        assert_eq!(stream.position(), 0);

        assert!(Rule::literal("b").lookahead().try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 0);

        assert!(Rule::literal("b")
            .negative_lookahead()
            .try_match(&mut stream).unwrap()
            .is_some());
        assert!(Rule::literal("a")
            .negative_lookahead()
            .try_match(&mut stream).unwrap()
            .is_none());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_lookbehind() {
        let toks = tokens(["x", "a", "b", "c"]);
        let mut stream = TokenStream::at(&toks, 3).unwrap();

        let ab = Rule::sequence([Rule::literal("a"), Rule::literal("b")]).unwrap();
        assert!(ab.lookbehind().try_match(&mut stream).unwrap().is_some());
        assert_eq!(stream.position(), 3);

        let xa = Rule::sequence([Rule::literal("x"), Rule::literal("a")]).unwrap();
        assert!(xa.lookbehind().try_match(&mut stream).unwrap().is_none());
        assert!(xa.negative_lookbehind().try_match(&mut stream).unwrap().is_some());
        assert!(ab.negative_lookbehind().try_match(&mut stream).unwrap().is_none());
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_lookbehind_at_start() {
        let toks = tokens(["a"]);
        let mut stream = TokenStream::new(&toks);
        assert!(Rule::literal("a").lookbehind().try_match(&mut stream).unwrap().is_none());
        assert!(Rule::start(Scope::Document)
            .lookbehind()
            .try_match(&mut stream).unwrap()
            .is_some());
    }

    #[test]
    fn test_lookbehind_inside_sequence() {
        // "b" only when preceded by "a"
        let rule = Rule::sequence([Rule::literal("a").lookbehind(), Rule::literal("b")]).unwrap();
        let toks = tokens(["a", "b", "c", "b"]);
        let mut stream = TokenStream::at(&toks, 1).unwrap();
        assert_eq!(rule.try_match(&mut stream).unwrap().unwrap().range(), 1..2);
        stream.seek(3).unwrap();
        assert!(rule.try_match(&mut stream).unwrap().is_none());
    }

    #[test]
    fn test_can_consume() {
        assert!(Rule::any().can_consume());
        assert!(!Rule::end(Scope::Document).can_consume());
        assert!(!Rule::literal("a").lookahead().can_consume());
        assert!(Rule::literal("a").optional().can_consume());
        assert!(!Rule::literal("a")
            .lookbehind()
            .repeat_infinitely()
            .can_consume());
        let mixed = Rule::sequence([Rule::start(Scope::Line), Rule::literal("a")]).unwrap();
        assert!(mixed.can_consume());
        assert!(Rule::lazy().can_consume());
        assert!(Rule::start(Scope::Line).is_zero_width());
        assert!(!Rule::any().is_zero_width());
    }

    #[test]
    fn test_display() {
        let rule = Rule::sequence([
            Rule::literal("a"),
            Rule::pattern(r"\d+").unwrap().repeat_between(1, 3).unwrap(),
            Rule::any_of([Rule::literal("x"), Rule::any()]).unwrap().optional(),
            Rule::end(Scope::Line),
        ])
        .unwrap();
        assert_eq!(rule.to_string(), r#"("a" /\d+/{1,3} ("x" | .)? $$)"#);
        assert_eq!(Rule::literal("a").repeat_exactly(2).unwrap().to_string(), r#""a"{2}"#);
        assert_eq!(Rule::named_lazy("expr").to_string(), "expr");
        assert_eq!(
            Rule::literal("a").lookbehind().to_string(),
            r#"<&"a""#
        );
        assert_eq!(
            Rule::literal("a").negative_lookahead().repeat_infinitely().to_string(),
            r#"(!"a")*"#
        );
        assert_eq!(
            Rule::literal("a\u{0}b\"\n\\").to_string(),
            r#""a\u{0}b\"\n\\""#
        );
        assert_eq!(Rule::literal("é\u{7f}").to_string(), r#""é\u{7f}""#);
    }

    fn nested_parens() -> Rule {
        // nest := "(" nest? ")"
        let nest = Rule::named_lazy("nest");
        nest.set(
            Rule::sequence([Rule::literal("("), nest.optional(), Rule::literal(")")]).unwrap(),
        )
        .unwrap();
        nest
    }

    #[test]
    fn test_depth_limit_ignores_recursion_that_consumes() {
        let nest = nested_parens();
        let mut values = vec!["("; 10];
        values.extend(vec![")"; 10]);
        let toks = tokens(values);

        // Every level is entered at a different position.
        let mut stream = TokenStream::new(&toks);
        let config = MatchConfig::new().max_depth(1);
        let m = nest.try_match_with(&mut stream, &config).unwrap().unwrap();
        assert_eq!(m.range(), 0..20);
    }

    #[test]
    fn test_depth_limit_counts_lazy_chain_at_one_position() {
        let inner = Rule::named_lazy("inner");
        inner.set(Rule::literal("x")).unwrap();
        let outer = Rule::named_lazy("outer");
        outer.set(inner.clone()).unwrap();
        let toks = tokens(["x"]);

        let mut stream = TokenStream::new(&toks);
        assert_eq!(
            outer
                .try_match_with(&mut stream, &MatchConfig::new().max_depth(1))
                .unwrap_err(),
            Error::DepthLimitExceeded { limit: 1 }
        );
        assert_eq!(stream.position(), 0);

        let m = outer
            .try_match_with(&mut stream, &MatchConfig::new().max_depth(2))
            .unwrap()
            .unwrap();
        assert_eq!(m.range(), 0..1);
    }

    #[test]
    fn test_deep_recursion_on_default_thread() {
        let nest = nested_parens();
        let mut values = vec!["("; 3_000];
        values.extend(vec![")"; 3_000]);
        let toks = tokens(values);

        let mut stream = TokenStream::new(&toks);
        let m = nest.try_match(&mut stream).unwrap().unwrap();
        assert_eq!(m.range(), 0..6_000);
    }

    #[test]
    fn test_left_recursion_is_an_error_not_a_miss() {
        let nest = Rule::lazy();
        nest.set(nest.then(Rule::literal("x")).or(Rule::literal("x")))
            .unwrap();
        let toks = tokens(["x"]);
        let mut stream = TokenStream::new(&toks);
        assert_eq!(
            nest.try_match(&mut stream).unwrap_err(),
            Error::DepthLimitExceeded {
                limit: DEFAULT_MAX_DEPTH
            }
        );
        assert_eq!(stream.position(), 0);

        assert!(nest
            .try_match_with(&mut stream, &MatchConfig::new().max_depth(8))
            .is_err());
    }
}
