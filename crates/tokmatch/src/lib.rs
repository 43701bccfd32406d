//! Composable pattern matching over token sequences.
//!
//! This crate is a regular-expression engine whose alphabet is lexical
//! tokens instead of characters. Rules are built from single-token matchers
//! and combinators, then applied to a [`TokenStream`] positioned at a
//! candidate offset. A failed match is `Ok(None)` and leaves the stream where
//! it was. Construction mistakes are reported as [`Error`]s up front, and a
//! grammar that recurses without consuming input fails with
//! [`Error::DepthLimitExceeded`] instead of looking like a miss.
//!
//! # Example
//!
//! ```
//! use tokmatch::{tokens, Rule, Scope, TokenStream};
//!
//! // A parenthesized span at the start of a line.
//! let parens = Rule::boundary(Rule::literal("("), None, Rule::literal(")")).unwrap();
//! let rule = Rule::sequence([Rule::start(Scope::Line), parens]).unwrap();
//!
//! let toks = tokens(["(", "a", "b", ")", "c"]);
//! let mut stream = TokenStream::new(&toks);
//! let m = rule.try_match(&mut stream).unwrap().unwrap();
//! assert_eq!(m.values(), vec!["(", "a", "b", ")"]);
//! assert_eq!(stream.position(), 4);
//!
//! // No match: the stream does not move.
//! let toks = tokens(["x", "(", ")"]);
//! let mut stream = TokenStream::new(&toks);
//! assert!(rule.try_match(&mut stream).unwrap().is_none());
//! assert_eq!(stream.position(), 0);
//! ```

mod config;
mod error;
mod matched;
mod rule;
mod scan;
mod stream;
mod token;

pub use config::{MatchConfig, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use matched::Match;
pub use rule::{Rule, Scope};
pub use scan::{FindIter, Scanner};
pub use stream::TokenStream;
pub use token::{tokens, Span, Token};
