//! A compact text notation for tokmatch rules.
//!
//! Expressions read like regular expressions over tokens:
//!
//! | Syntax              | Rule                                    |
//! |---------------------|-----------------------------------------|
//! | `"text"`            | token whose value equals `text`         |
//! | `/re/`              | token whose whole value matches `re`    |
//! | `.`                 | any token                               |
//! | `len(a, b)`         | token of `a..=b` characters             |
//! | `^` `$` / `^^` `$$` | line / document anchors                 |
//! | `x?` `x*` `x+`      | optional and unbounded repetition       |
//! | `x{n}` `x{n,m}`     | counted repetition (`{n,}`, `{,m}` too) |
//! | `~x`                | one token that `x` does not match       |
//! | `&x` `!x`           | lookahead                               |
//! | `<&x` `<!x`         | lookbehind                              |
//! | `x y`               | sequence                                |
//! | `x \| y`            | first alternative that matches          |
//! | `[x]`               | `x` matched inside a group token        |
//! | `between(s, e)`     | `s`, any tokens, then `e`               |
//! | `between(s, m, e)`  | as above with every middle token `m`    |
//!
//! A [`Grammar`] is a list of `name = expr;` definitions, with `#` comments.
//! Names may be referenced before they are defined and may recurse.

mod grammar;
mod parse;

pub use grammar::{compile, compile_expr, Grammar};
pub use parse::{parse_definitions, parse_expr, Definition, Expr, PrefixOp, Quantifier};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotationError {
    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("undefined rule: {0}")]
    UndefinedRule(String),

    #[error("rule defined twice: {0}")]
    DuplicateRule(String),

    #[error(transparent)]
    Rule(#[from] tokmatch::Error),
}
