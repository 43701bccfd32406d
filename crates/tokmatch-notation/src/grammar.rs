//! Compiling parsed notation into rule trees.

use crate::parse::{parse_definitions, parse_expr, Definition, Expr, PrefixOp, Quantifier};
use crate::NotationError;
use std::collections::HashMap;
use tokmatch::Rule;
use tracing::debug;

/// A set of named rules that may refer to each other and to themselves.
///
/// Every name is backed by a lazy rule, so definitions can appear in any
/// order and recursion needs no special syntax.
///
/// # Example
///
/// ```
/// use tokmatch::{tokens, TokenStream};
/// use tokmatch_notation::Grammar;
///
/// let grammar = Grammar::parse(r#"
///     value = /\d+/ | list;
///     list  = "[" (value ("," value)*)? "]";
/// "#).unwrap();
///
/// let toks = tokens(["[", "1", ",", "[", "]", "]"]);
/// let list = grammar.rule("list").unwrap();
/// assert_eq!(list.try_match(&mut TokenStream::new(&toks)).unwrap().unwrap().len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    names: Vec<String>,
    rules: HashMap<String, Rule>,
}

impl Grammar {
    pub fn parse(source: &str) -> Result<Self, NotationError> {
        let definitions = parse_definitions(source)?;
        Self::from_definitions(definitions)
    }

    pub fn from_definitions(definitions: Vec<Definition>) -> Result<Self, NotationError> {
        let mut names = Vec::with_capacity(definitions.len());
        let mut rules = HashMap::with_capacity(definitions.len());
        for def in &definitions {
            if rules.contains_key(&def.name) {
                return Err(NotationError::DuplicateRule(def.name.clone()));
            }
            rules.insert(def.name.clone(), Rule::named_lazy(&def.name));
            names.push(def.name.clone());
        }

        for def in &definitions {
            let compiled = compile_expr(&def.expr, &rules)?;
            if let Some(lazy) = rules.get(&def.name) {
                lazy.set(compiled)?;
            }
        }

        debug!(rules = names.len(), "compiled grammar");
        Ok(Self { names, rules })
    }

    /// The rule defined under `name`.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Rule names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Compiles a single expression that does not refer to named rules.
///
/// ```
/// use tokmatch::{tokens, TokenStream};
///
/// let rule = tokmatch_notation::compile(r#"between("(", ")")"#).unwrap();
/// let toks = tokens(["(", "a", ")"]);
/// assert!(rule.try_match(&mut TokenStream::new(&toks)).unwrap().is_some());
/// ```
pub fn compile(source: &str) -> Result<Rule, NotationError> {
    let expr = parse_expr(source)?;
    compile_expr(&expr, &HashMap::new())
}

pub fn compile_expr(expr: &Expr, names: &HashMap<String, Rule>) -> Result<Rule, NotationError> {
    let rule = match expr {
        Expr::Literal(text) => Rule::literal(text),
        Expr::Pattern(source) => Rule::pattern(source)?,
        Expr::Any => Rule::any(),
        Expr::Length { min, max } => Rule::length(*min, *max)?,
        Expr::Start(scope) => Rule::start(*scope),
        Expr::End(scope) => Rule::end(*scope),
        Expr::Ref(name) => names
            .get(name)
            .cloned()
            .ok_or_else(|| NotationError::UndefinedRule(name.clone()))?,
        Expr::Prefixed { op, expr } => {
            let inner = compile_expr(expr, names)?;
            match op {
                PrefixOp::Not => inner.not()?,
                PrefixOp::Lookahead => inner.lookahead(),
                PrefixOp::NegativeLookahead => inner.negative_lookahead(),
                PrefixOp::Lookbehind => inner.lookbehind(),
                PrefixOp::NegativeLookbehind => inner.negative_lookbehind(),
            }
        }
        Expr::Quantified { expr, quantifier } => {
            let inner = compile_expr(expr, names)?;
            match *quantifier {
                Quantifier::Optional => inner.optional(),
                Quantifier::AtLeast(n) => inner.repeat_at_least(n),
                Quantifier::Exactly(n) => inner.repeat_exactly(n)?,
                Quantifier::AtMost(n) => inner.repeat_at_most(n)?,
                Quantifier::Between(min, max) => inner.repeat_between(min, max)?,
            }
        }
        Expr::Sequence(items) => Rule::sequence(compile_all(items, names)?)?,
        Expr::Alternation(items) => Rule::any_of(compile_all(items, names)?)?,
        Expr::Boundary { start, middle, end } => {
            let middle = match middle {
                Some(m) => Some(compile_expr(m, names)?),
                None => None,
            };
            Rule::boundary(
                compile_expr(start, names)?,
                middle,
                compile_expr(end, names)?,
            )?
        }
        Expr::Group(inner) => compile_expr(inner, names)?.group(),
    };
    Ok(rule)
}

fn compile_all(items: &[Expr], names: &HashMap<String, Rule>) -> Result<Vec<Rule>, NotationError> {
    items.iter().map(|e| compile_expr(e, names)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokmatch::{tokens, TokenStream};

    fn matched(rule: &Rule, values: &[&str]) -> Option<usize> {
        let toks = tokens(values.iter().copied());
        let mut stream = TokenStream::new(&toks);
        rule.try_match(&mut stream).unwrap().map(|m| m.len())
    }

    #[test]
    fn test_compile_sequence() {
        let rule = compile(r#"/\d+/ /[a-z]+/"#).unwrap();
        assert_eq!(matched(&rule, &["123", "abc"]), Some(2));
        assert_eq!(matched(&rule, &["123", "456"]), None);
    }

    #[test]
    fn test_compile_repetition() {
        let rule = compile(r#""a"{2,3}"#).unwrap();
        assert_eq!(matched(&rule, &["a"]), None);
        assert_eq!(matched(&rule, &["a", "a"]), Some(2));
        assert_eq!(matched(&rule, &["a", "a", "a", "a"]), Some(3));
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            compile("missing"),
            Err(NotationError::UndefinedRule(name)) if name == "missing"
        ));
        assert!(matches!(
            compile(r#""a"{0}"#),
            Err(NotationError::Rule(tokmatch::Error::InvalidArgument(_)))
        ));
        assert!(matches!(
            compile(r#"~("a" "b")"#),
            Err(NotationError::Rule(tokmatch::Error::NotInvertible(_)))
        ));
        assert!(matches!(
            compile("/(/"),
            Err(NotationError::Rule(tokmatch::Error::InvalidPattern(_)))
        ));
        assert!(matches!(
            compile(r#"between("(", $, ")")"#),
            Err(NotationError::Rule(tokmatch::Error::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_double_negation_cancels() {
        let rule = compile(r#"~~"a""#).unwrap();
        assert_eq!(rule.to_string(), r#""a""#);
        assert_eq!(matched(&rule, &["a"]), Some(1));
        assert!(matches!(
            Grammar::parse(r#"word = /\w+/; other = ~word;"#),
            Err(NotationError::Rule(tokmatch::Error::NotInvertible(_)))
        ));
    }

    #[test]
    fn test_duplicate_definition() {
        assert!(matches!(
            Grammar::parse(r#"a = "x"; a = "y";"#),
            Err(NotationError::DuplicateRule(name)) if name == "a"
        ));
    }

    #[test]
    fn test_names_in_order() {
        let grammar = Grammar::parse(r#"b = "b"; a = b;"#).unwrap();
        assert_eq!(grammar.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(grammar.len(), 2);
        assert!(grammar.rule("c").is_none());
    }
}
