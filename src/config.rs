//! Run-wide configuration.
//!
//! A [`RunConfig`] is built once from the parsed CLI arguments and then
//! passed by reference into every component call. Nothing in it changes
//! while a run is in progress.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of vendored modules, relative to the web root.
pub const MODULES_SUBDIR: &str = "sites/all/modules";

/// Composer namespace that all Drupal projects are published under.
pub const PACKAGE_NAMESPACE: &str = "drupal";

/// Composer manifest file name at the project root.
pub const MANIFEST_FILE: &str = "composer.json";

/// Composer lock file name at the project root.
pub const LOCK_FILE: &str = "composer.lock";

/// Front-end library directory, relative to the web root.
pub const LIBRARIES_DIR: &str = "libraries";

/// Default per-invocation budget for external tools.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(900);

/// Immutable settings for one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Project root; the working directory of every external tool.
    pub project_root: PathBuf,
    /// Web root relative to the project root (empty when they coincide).
    pub web_root: PathBuf,
    /// Site selector passed to drush as `--uri` on multisite installations.
    pub site_uri: Option<String>,
    /// Per-invocation timeout for external tools. `None` waits forever.
    pub tool_timeout: Option<Duration>,
    /// Whether the cache-rebuild gate runs after each applied action.
    pub rebuild_cache: bool,
}

impl RunConfig {
    /// Creates a config for `project_root` with default settings.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            web_root: PathBuf::new(),
            site_uri: None,
            tool_timeout: Some(DEFAULT_TOOL_TIMEOUT),
            rebuild_cache: true,
        }
    }

    /// Sets the web root (relative to the project root).
    #[must_use]
    pub fn with_web_root(mut self, web_root: impl Into<PathBuf>) -> Self {
        self.web_root = web_root.into();
        self
    }

    /// Sets the multisite site selector.
    #[must_use]
    pub fn with_site_uri(mut self, site_uri: Option<String>) -> Self {
        self.site_uri = site_uri.filter(|uri| !uri.is_empty());
        self
    }

    /// Sets the tool timeout. A zero duration disables the timeout.
    #[must_use]
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Enables or disables the cache-rebuild gate.
    #[must_use]
    pub fn with_cache_rebuild(mut self, enabled: bool) -> Self {
        self.rebuild_cache = enabled;
        self
    }

    /// Vendored module directory, relative to the project root.
    #[must_use]
    pub fn modules_dir(&self) -> PathBuf {
        self.web_root.join(MODULES_SUBDIR)
    }

    /// Vendored module directory as an absolute (project-rooted) path.
    #[must_use]
    pub fn modules_root(&self) -> PathBuf {
        self.project_root.join(self.modules_dir())
    }

    /// Library directory, relative to the project root.
    #[must_use]
    pub fn libraries_dir(&self) -> PathBuf {
        self.web_root.join(LIBRARIES_DIR)
    }

    /// Absolute path of the Composer manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(MANIFEST_FILE)
    }

    /// Resolves a project-relative path against the project root.
    #[must_use]
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Paths a Composer require/remove touches, relative to the project root.
    #[must_use]
    pub fn dependency_paths(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(MANIFEST_FILE), PathBuf::from(LOCK_FILE), self.libraries_dir()]
    }
}

/// Returns the Composer package name for a module.
#[must_use]
pub fn package_name(module: &str) -> String {
    format!("{PACKAGE_NAMESPACE}/{module}")
}
