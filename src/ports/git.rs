//! Version-control port for path-scoped commits.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::error::CheckpointError;

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A commit was created.
    Committed {
        /// Hash of the new HEAD.
        commit: String,
    },
    /// The paths had no changes to record.
    NothingToCommit,
}

/// Stages and commits explicit path sets.
///
/// Nothing here ever stages the whole working tree: every operation takes
/// the exact paths it should consider.
pub trait VersionControl: Send + Sync {
    /// Returns `true` if the repository tracks `path` (or anything under it).
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Inspect`] if the query fails.
    fn is_tracked(&self, config: &RunConfig, path: &Path) -> Result<bool, CheckpointError>;

    /// Stages the given paths, including deletions.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Stage`] if staging fails.
    fn stage(&self, config: &RunConfig, paths: &[PathBuf]) -> Result<(), CheckpointError>;

    /// Commits the given paths, and only those, with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Commit`] if the commit fails for any
    /// reason other than an empty change set.
    fn commit(
        &self,
        config: &RunConfig,
        message: &str,
        paths: &[PathBuf],
    ) -> Result<CommitOutcome, CheckpointError>;
}
