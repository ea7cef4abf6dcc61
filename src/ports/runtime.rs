//! Application runtime port.

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::error::{ExecutionError, ProbeError};

/// What the live application reports about one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeModule {
    /// Raw status label (e.g. `"Enabled"`, `"Disabled"`, `"Not installed"`).
    pub status: String,
    /// Version the runtime has loaded, if it reports one.
    #[serde(default)]
    pub version: Option<String>,
}

/// Queries and maintains the running application.
pub trait ApplicationRuntime: Send + Sync {
    /// Looks up a module's activation status. `Ok(None)` means the runtime
    /// does not know the module at all.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::MultisiteBootstrap`] when the runtime cannot
    /// bootstrap without a site selector, or [`ProbeError::Other`] for any
    /// other failure.
    fn module_info(
        &self,
        config: &RunConfig,
        module: &str,
    ) -> Result<Option<RuntimeModule>, ProbeError>;

    /// Empties the application caches and rebuilds them.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] if any rebuild step fails.
    fn rebuild_cache(&self, config: &RunConfig) -> Result<(), ExecutionError>;
}
