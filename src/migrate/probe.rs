//! Module state across the filesystem, the manifest and the runtime.

use std::fmt;

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::ProbeError;
use crate::migrate::module::ModuleDescriptor;

/// Activation state reported by the application runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationState {
    /// Installed and enabled.
    Enabled,
    /// Installed but switched off.
    Disabled,
    /// Known to the runtime but never installed.
    NotInstalled,
    /// Not reported, or reported with an unrecognised status.
    Unknown,
}

impl ActivationState {
    /// All states, for exhaustive tests and reports.
    pub const ALL: [Self; 4] = [Self::Enabled, Self::Disabled, Self::NotInstalled, Self::Unknown];

    /// Maps a drush status string, ignoring case.
    #[must_use]
    pub fn from_runtime_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "not installed" => Self::NotInstalled,
            _ => Self::Unknown,
        }
    }

    /// The runtime reports the module as switched off. A module that was
    /// never installed does not count.
    #[must_use]
    pub fn is_disabled(self) -> bool {
        self == Self::Disabled
    }
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::NotInstalled => "not installed",
            Self::Unknown => "unknown",
        })
    }
}

/// Snapshot of one module's state. Probe again to observe changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    /// The module probed.
    pub descriptor: ModuleDescriptor,
    /// The vendored directory exists.
    pub present_on_disk: bool,
    /// Constraint declared in `composer.json`, if any.
    pub managed_version: Option<String>,
    /// Runtime activation state.
    pub activation: ActivationState,
    /// Version the runtime reports, if any.
    pub runtime_version: Option<String>,
}

impl ModuleStatus {
    /// The package is declared in the manifest's `require` mapping.
    #[must_use]
    pub fn managed_by_dependency_manager(&self) -> bool {
        self.managed_version.is_some()
    }
}

/// Builds a [`ModuleStatus`] from the three probe sources.
///
/// The filesystem is checked first, then the manifest, then the runtime.
///
/// # Errors
///
/// Returns [`ProbeError::MultisiteBootstrap`] when the runtime needs a site
/// selector, and [`ProbeError::Other`] when any source cannot be queried.
pub fn probe(
    ctx: &ServiceContext,
    config: &RunConfig,
    descriptor: &ModuleDescriptor,
) -> Result<ModuleStatus, ProbeError> {
    let present_on_disk = ctx.fs.exists(&config.resolve(&descriptor.relative_path));
    let managed_version = ctx.manifest.required_version(config, &descriptor.package)?;
    let runtime = ctx.runtime.module_info(config, &descriptor.name)?;

    let (activation, runtime_version) = match runtime {
        Some(module) => (ActivationState::from_runtime_status(&module.status), module.version),
        None => (ActivationState::Unknown, None),
    };

    Ok(ModuleStatus {
        descriptor: descriptor.clone(),
        present_on_disk,
        managed_version,
        activation,
        runtime_version,
    })
}
