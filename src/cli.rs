//! CLI argument definitions.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::RunConfig;

/// Top-level CLI parser for `modmove`.
#[derive(Debug, Parser)]
#[command(
    name = "modmove",
    version,
    about = "Move vendored Drupal modules from sites/all/modules to Composer"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the state of each vendored module and the actions a migration would take
    Plan {
        /// Project location and tool settings.
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Migrate each vendored module, committing every step
    ///
    /// Each action is confirmed first: delete the vendored copy, then
    /// require or remove the package with Composer.
    Migrate {
        /// Project location and tool settings.
        #[command(flatten)]
        project: ProjectArgs,

        /// Apply every action without prompting
        #[arg(short, long)]
        yes: bool,

        /// Do not rebuild the Drupal cache after each action
        #[arg(long)]
        skip_cache_rebuild: bool,
    },
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Drupal project path
    #[arg(default_value = ".")]
    pub project_path: PathBuf,

    /// Site URI if the project is a multisite
    #[arg(long, env = "MODMOVE_SITE_URI", value_name = "URI")]
    pub site_uri: Option<String>,

    /// Web root, relative to the project path
    #[arg(long, env = "MODMOVE_WEB_ROOT", value_name = "DIR")]
    pub web_root: Option<PathBuf>,

    /// Per-invocation timeout for composer, drush and git (0 disables)
    #[arg(long, env = "MODMOVE_TOOL_TIMEOUT", value_name = "SECS", default_value_t = 900)]
    pub tool_timeout: u64,
}

impl ProjectArgs {
    /// Converts the arguments into the run configuration.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.project_path)
            .with_site_uri(self.site_uri.clone())
            .with_tool_timeout(Duration::from_secs(self.tool_timeout));
        if let Some(web_root) = &self.web_root {
            config = config.with_web_root(web_root);
        }
        config
    }
}
