//! Dependency manager port.

use crate::config::RunConfig;
use crate::error::ExecutionError;

/// Adds and removes packages through the project's dependency manager.
///
/// The manager resolves dependencies itself; its exit status is treated
/// as the final word on whether the change succeeded.
pub trait DependencyManager: Send + Sync {
    /// Requires `package` at `constraint`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] if the manager fails or exits non-zero.
    fn require(
        &self,
        config: &RunConfig,
        package: &str,
        constraint: &str,
    ) -> Result<(), ExecutionError>;

    /// Removes `package`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] if the manager fails or exits non-zero.
    fn remove(&self, config: &RunConfig, package: &str) -> Result<(), ExecutionError>;
}
