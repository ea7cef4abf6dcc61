//! Discovery of vendored modules and their descriptors.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::config::{package_name, RunConfig};
use crate::context::ServiceContext;
use crate::error::{DataError, MigrateError};

/// Identity of one vendored module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Directory name, unique within a scan.
    pub name: String,
    /// Module directory relative to the project root.
    pub relative_path: PathBuf,
    /// `version` from `<name>.info.yml`.
    pub legacy_version: String,
    /// Composer package name.
    pub package: String,
    /// Paths a Composer change for this module touches.
    pub dependency_paths: Vec<PathBuf>,
}

impl ModuleDescriptor {
    /// Release notes page on drupal.org for the vendored version.
    #[must_use]
    pub fn release_page(&self) -> String {
        format!("https://www.drupal.org/project/{}/releases/{}", self.name, self.legacy_version)
    }
}

/// Lists module directory names in filesystem order.
///
/// Hidden directories such as `.svn` are not modules. A project without a
/// vendored module directory has no modules.
///
/// # Errors
///
/// Returns [`MigrateError::Discovery`] if the directory exists but cannot be listed.
pub fn discover(ctx: &ServiceContext, config: &RunConfig) -> Result<Vec<String>, MigrateError> {
    let root = config.modules_root();
    if !ctx.fs.exists(&root) {
        debug!(path = %root.display(), "no vendored module directory");
        return Ok(Vec::new());
    }
    let names = ctx
        .fs
        .list_dirs(&root)
        .map_err(|e| MigrateError::Discovery { path: root, reason: e.to_string() })?;
    Ok(names.into_iter().filter(|name| !name.starts_with('.')).collect())
}

fn info_path(config: &RunConfig, name: &str) -> PathBuf {
    config.modules_root().join(name).join(format!("{name}.info.yml"))
}

/// Loads the descriptor for the module in directory `name`.
///
/// # Errors
///
/// Returns a [`DataError`] if the info file is unreadable, is not a YAML
/// mapping or lacks a scalar `version`.
pub fn describe(
    ctx: &ServiceContext,
    config: &RunConfig,
    name: &str,
) -> Result<ModuleDescriptor, DataError> {
    let path = info_path(config, name);
    let contents = ctx.fs.read_to_string(&path).map_err(|e| DataError::UnreadableInfo {
        module: name.to_string(),
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let legacy_version = parse_version(name, &path, &contents)?;

    Ok(ModuleDescriptor {
        name: name.to_string(),
        relative_path: config.modules_dir().join(name),
        legacy_version,
        package: package_name(name),
        dependency_paths: config.dependency_paths(),
    })
}

fn parse_version(name: &str, path: &Path, contents: &str) -> Result<String, DataError> {
    let invalid = |reason: String| DataError::InvalidInfo {
        module: name.to_string(),
        path: path.to_path_buf(),
        reason,
    };

    let info: Value = serde_yaml::from_str(contents).map_err(|e| invalid(e.to_string()))?;
    let Value::Mapping(info) = info else {
        return Err(invalid("expected a mapping".to_string()));
    };

    match info.get("version") {
        None | Some(Value::Null) => {
            Err(DataError::MissingVersion { module: name.to_string(), path: path.to_path_buf() })
        }
        Some(Value::String(version)) => Ok(version.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(_) => {
            Err(DataError::InvalidVersion { module: name.to_string(), path: path.to_path_buf() })
        }
    }
}
