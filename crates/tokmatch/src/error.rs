use thiserror::Error;

/// Errors raised while building rules or driving a stream.
///
/// A failed match is never an error: it is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing rule: {0}")]
    MissingRule(&'static str),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("{0} rules cannot be negated")]
    NotInvertible(&'static str),

    #[error("position {index} is out of range for a stream of {len} tokens")]
    OutOfRange { index: usize, len: usize },

    #[error("lazy rule was used before it was initialized")]
    NotInitialized,

    #[error("lazy rule is already initialized")]
    AlreadyInitialized,

    #[error("match exceeded the recursion limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
