//! Forward references for recursive grammars.

use super::Rule;
use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use tracing::debug;

/// A single-assignment cell holding the rule a lazy reference points to.
///
/// The cell is set once while the grammar is being built. Setting it again
/// is an error, and so is reading it before it was set.
#[derive(Debug)]
pub(crate) struct LazyCell {
    name: Option<String>,
    target: OnceCell<Rule>,
}

impl LazyCell {
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            name,
            target: OnceCell::new(),
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set(&self, rule: Rule) -> Result<()> {
        self.target
            .set(rule)
            .map_err(|_| Error::AlreadyInitialized)?;
        debug!(name = self.name.as_deref().unwrap_or("<anonymous>"), "lazy rule initialized");
        Ok(())
    }

    pub(crate) fn get(&self) -> Result<&Rule> {
        self.target.get().ok_or(Error::NotInitialized)
    }

    /// The target if it has been set. Matching treats an unset cell as a
    /// rule that never matches.
    pub(crate) fn target(&self) -> Option<&Rule> {
        self.target.get()
    }
}
