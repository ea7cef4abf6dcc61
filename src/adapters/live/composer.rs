//! Composer adapters: manifest reader and CLI wrapper.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::config::RunConfig;
use crate::error::{ExecutionError, ProbeError};
use crate::ports::{CommandRunner, CommandSpec, DependencyManager, DependencyManifest, FileSystem};

/// The subset of `composer.json` the migration reads.
#[derive(Debug, Deserialize)]
struct ComposerJson {
    #[serde(default)]
    require: serde_json::Map<String, Value>,
}

/// Reads `require` declarations from the project's `composer.json`.
pub struct ComposerManifest {
    fs: Arc<dyn FileSystem>,
}

impl ComposerManifest {
    /// Creates a manifest reader over the given filesystem.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl DependencyManifest for ComposerManifest {
    fn required_version(
        &self,
        config: &RunConfig,
        package: &str,
    ) -> Result<Option<String>, ProbeError> {
        let path = config.manifest_path();
        let contents = self
            .fs
            .read_to_string(&path)
            .map_err(|e| ProbeError::manifest(format!("cannot read {}: {e}", path.display())))?;
        let manifest: ComposerJson = serde_json::from_str(&contents)
            .map_err(|e| ProbeError::manifest(format!("cannot parse {}: {e}", path.display())))?;

        Ok(manifest.require.get(package).map(|constraint| match constraint {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

/// Runs `composer require` / `composer remove` in the project root.
pub struct ComposerCli {
    runner: Arc<dyn CommandRunner>,
}

impl ComposerCli {
    /// Creates a Composer wrapper over the given command runner.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn composer(&self, config: &RunConfig, args: &[String]) -> Result<(), ExecutionError> {
        let spec = CommandSpec::new("composer", &config.project_root)
            .args(args.iter().cloned())
            .timeout(config.tool_timeout);
        let output = self.runner.run(&spec)?;
        if !output.success() {
            return Err(ExecutionError::exit(&spec.display(), output.exit_code, &output.stderr));
        }
        Ok(())
    }
}

impl DependencyManager for ComposerCli {
    fn require(
        &self,
        config: &RunConfig,
        package: &str,
        constraint: &str,
    ) -> Result<(), ExecutionError> {
        self.composer(config, &["require".into(), format!("{package}:{constraint}")])?;
        info!(package, constraint, "required with composer");
        Ok(())
    }

    fn remove(&self, config: &RunConfig, package: &str) -> Result<(), ExecutionError> {
        self.composer(config, &["remove".into(), package.to_string()])?;
        info!(package, "removed with composer");
        Ok(())
    }
}
