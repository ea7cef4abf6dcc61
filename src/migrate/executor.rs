//! Applies decided actions.

use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::{ExecutionError, ExecutionErrorKind};
use crate::migrate::decision::{Action, ActionKind};

/// Outcome of the cache-rebuild gate that follows an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheRebuild {
    /// The cache was rebuilt.
    Succeeded,
    /// The rebuild failed. The action itself stays applied.
    Failed(String),
    /// No rebuild was attempted.
    Skipped,
}

/// What the checkpointer should commit for an applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRequest {
    /// Commit message.
    pub message: String,
    /// Paths to stage, relative to the project root.
    pub paths: Vec<PathBuf>,
}

/// Result of a successfully applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Commit to record, absent for a no-op.
    pub checkpoint: Option<CheckpointRequest>,
    /// Cache-rebuild gate outcome.
    pub cache: CacheRebuild,
}

/// Applies one action, then runs the cache-rebuild gate.
///
/// # Errors
///
/// Returns an [`ExecutionError`] if the delete target escapes the module
/// root, the directory cannot be removed, or Composer fails.
pub fn execute(
    ctx: &ServiceContext,
    config: &RunConfig,
    action: &Action,
) -> Result<ExecutionResult, ExecutionError> {
    match &action.kind {
        ActionKind::NoOp => {
            return Ok(ExecutionResult { checkpoint: None, cache: CacheRebuild::Skipped });
        }
        ActionKind::Delete { target } => delete(ctx, config, target)?,
        ActionKind::InstallViaManager { package, constraint } => {
            ctx.packages.require(config, package, constraint)?;
        }
        ActionKind::UninstallViaManager { package } => ctx.packages.remove(config, package)?,
    }

    info!(action = %action.label(), "applied");

    Ok(ExecutionResult {
        checkpoint: Some(CheckpointRequest {
            message: action.message.clone(),
            paths: action.paths.clone(),
        }),
        cache: rebuild_cache(ctx, config),
    })
}

fn delete(ctx: &ServiceContext, config: &RunConfig, target: &Path) -> Result<(), ExecutionError> {
    let path = guarded_target(config, target)?;
    if !ctx.fs.exists(&path) {
        info!(path = %path.display(), "already absent");
        return Ok(());
    }
    ctx.fs.remove_dir_all(&path).map_err(|e| {
        ExecutionError::new(
            ExecutionErrorKind::Filesystem,
            format!("cannot remove {}: {e}", path.display()),
        )
    })
}

/// Resolves `target` and checks that it names a direct child of the
/// module root.
fn guarded_target(config: &RunConfig, target: &Path) -> Result<PathBuf, ExecutionError> {
    let root = normalize(&config.modules_root());
    let path = normalize(&config.resolve(target));
    if path.parent() == Some(root.as_path()) && path.file_name().is_some() {
        Ok(path)
    } else {
        Err(ExecutionError::new(
            ExecutionErrorKind::PathOutsideModuleRoot,
            format!("{} is not a module directory under {}", target.display(), root.display()),
        ))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn rebuild_cache(ctx: &ServiceContext, config: &RunConfig) -> CacheRebuild {
    if !config.rebuild_cache {
        return CacheRebuild::Skipped;
    }
    match ctx.runtime.rebuild_cache(config) {
        Ok(()) => CacheRebuild::Succeeded,
        Err(err) => {
            warn!(error = %err, "cache rebuild failed");
            CacheRebuild::Failed(err.to_string())
        }
    }
}
