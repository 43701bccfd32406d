/// Default limit on lazy rules nested at a single stream position.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings for a single match attempt.
///
/// # Example
///
/// ```
/// use tokmatch::MatchConfig;
///
/// let config = MatchConfig::new().max_depth(64);
/// assert_eq!(config.depth_limit(), Some(64));
/// assert_eq!(MatchConfig::unbounded().depth_limit(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    max_depth: Option<usize>,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No limit. A left-recursive grammar then recurses until memory runs
    /// out.
    pub fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// Limits how many lazy rules may be nested without a token being
    /// consumed in between. Recursion that consumes input is not limited,
    /// so this only stops grammars that recurse without making progress.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn depth_limit(&self) -> Option<usize> {
        self.max_depth
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}
