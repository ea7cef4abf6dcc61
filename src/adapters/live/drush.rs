//! Drush adapter for runtime status queries and cache rebuilds.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::RunConfig;
use crate::error::{ExecutionError, ProbeError};
use crate::ports::{ApplicationRuntime, CommandOutput, CommandRunner, CommandSpec, RuntimeModule};

/// Diagnostic drush prints when a command cannot bootstrap the site.
///
/// Multisite installations produce it when no `--uri` is given. The text is
/// not a documented contract of drush and may change between releases.
pub const BOOTSTRAP_MARKER: &str = "needs a higher bootstrap level";

/// Live runtime adapter that shells out to `drush`.
pub struct DrushRuntime {
    runner: Arc<dyn CommandRunner>,
}

impl DrushRuntime {
    /// Creates a drush adapter over the given command runner.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn command<I, S>(config: &RunConfig, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CommandSpec::new("drush", &config.project_root)
            .args(args)
            .timeout(config.tool_timeout);
        match &config.site_uri {
            Some(uri) => spec.arg(format!("--uri={uri}")),
            None => spec,
        }
    }

    fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecutionError> {
        let output = self.runner.run(spec)?;
        if !output.success() {
            return Err(ExecutionError::exit(&spec.display(), output.exit_code, &output.stderr));
        }
        Ok(output)
    }
}

impl ApplicationRuntime for DrushRuntime {
    fn module_info(
        &self,
        config: &RunConfig,
        module: &str,
    ) -> Result<Option<RuntimeModule>, ProbeError> {
        let spec = Self::command(
            config,
            ["pm-list".to_string(), format!("--filter={module}"), "--format=json".to_string()],
        );
        let output = self.runner.run(&spec).map_err(|e| ProbeError::runtime(e.to_string()))?;

        if !output.success() {
            if output.stderr.contains(BOOTSTRAP_MARKER) {
                return Err(ProbeError::MultisiteBootstrap);
            }
            return Err(ProbeError::runtime(format!(
                "{} exited with status {}: {}",
                spec.display(),
                output.exit_code,
                output.stderr.trim()
            )));
        }

        parse_pm_list(&output.stdout, module)
    }

    fn rebuild_cache(&self, config: &RunConfig) -> Result<(), ExecutionError> {
        let listing =
            self.run_checked(&Self::command(config, ["sql-query", "SHOW TABLES LIKE 'cache%'"]))?;
        let tables = cache_tables(&listing.stdout);
        debug!(count = tables.len(), "truncating cache tables");

        if !tables.is_empty() {
            let statements: String =
                tables.iter().map(|table| format!("TRUNCATE TABLE {table};")).collect();
            self.run_checked(&Self::command(config, ["sql-query".to_string(), statements]))?;
        }

        self.run_checked(&Self::command(config, ["cr"]))?;
        Ok(())
    }
}

/// Extracts `module`'s entry from `drush pm-list --format=json` output.
fn parse_pm_list(stdout: &str, module: &str) -> Result<Option<RuntimeModule>, ProbeError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let listing: Value = serde_json::from_str(trimmed)
        .map_err(|e| ProbeError::runtime(format!("cannot parse pm-list output: {e}")))?;

    // drush prints `[]` rather than `{}` when the filter matches nothing.
    let Some(entry) = listing.as_object().and_then(|modules| modules.get(module)) else {
        return Ok(None);
    };
    serde_json::from_value(entry.clone())
        .map(Some)
        .map_err(|e| ProbeError::runtime(format!("unexpected pm-list entry for {module}: {e}")))
}

/// Table names from `SHOW TABLES` output, one per line.
fn cache_tables(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| line.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .collect()
}
