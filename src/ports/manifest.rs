//! Dependency manifest port.

use crate::config::RunConfig;
use crate::error::ProbeError;

/// Answers whether a package is declared in the project's manifest.
pub trait DependencyManifest: Send + Sync {
    /// Returns the declared constraint for `package`, or `None` if the
    /// manifest does not require it.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Other`] if the manifest cannot be read or parsed.
    fn required_version(
        &self,
        config: &RunConfig,
        package: &str,
    ) -> Result<Option<String>, ProbeError>;
}
