//! Error types for the migration engine.
//!
//! Each component fails with its own error kind so the run loop can apply
//! a different propagation policy per kind: data and probe errors abort
//! the run, execution errors abort only the current module, checkpoint
//! errors are reported and the run carries on.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A module's own metadata is missing or malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The `<name>.info.yml` file could not be read.
    #[error("module {module}: cannot read {}: {reason}", path.display())]
    UnreadableInfo {
        /// Module name.
        module: String,
        /// Info file path.
        path: PathBuf,
        /// Underlying read error.
        reason: String,
    },
    /// The info file is not a valid YAML mapping.
    #[error("module {module}: unable to parse {}: {reason}", path.display())]
    InvalidInfo {
        /// Module name.
        module: String,
        /// Info file path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
    /// The info file has no `version` key.
    #[error("module {module}: version is missing in {}", path.display())]
    MissingVersion {
        /// Module name.
        module: String,
        /// Info file path.
        path: PathBuf,
    },
    /// The `version` key is present but not a scalar.
    #[error("module {module}: version in {} is not a string", path.display())]
    InvalidVersion {
        /// Module name.
        module: String,
        /// Info file path.
        path: PathBuf,
    },
}

/// Which probe source failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource {
    /// The dependency manifest.
    Manifest,
    /// The application runtime.
    Runtime,
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Manifest => "manifest",
            Self::Runtime => "runtime",
        })
    }
}

/// A status query could not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The runtime needs a site selector to bootstrap.
    #[error("this project is a multisite installation, rerun with --site-uri=SITE_URI")]
    MultisiteBootstrap,
    /// Any other query failure.
    #[error("{origin} query failed: {detail}")]
    Other {
        /// The source that failed.
        origin: ProbeSource,
        /// What went wrong.
        detail: String,
    },
}

impl ProbeError {
    pub(crate) fn manifest(detail: impl Into<String>) -> Self {
        Self::Other { origin: ProbeSource::Manifest, detail: detail.into() }
    }

    pub(crate) fn runtime(detail: impl Into<String>) -> Self {
        Self::Other { origin: ProbeSource::Runtime, detail: detail.into() }
    }
}

/// A subprocess could not be run to completion.
///
/// Serializable so that recorded cassettes can reproduce each failure kind.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessError {
    /// The program is not installed or not on `PATH`.
    #[error("{program}: command not found")]
    NotFound {
        /// Program name.
        program: String,
    },
    /// The program exceeded its time budget and was killed.
    #[error("{program}: timed out after {}s", timeout_secs)]
    TimedOut {
        /// Program name.
        program: String,
        /// Budget in seconds.
        timeout_secs: u64,
    },
    /// Spawning or waiting failed for another reason.
    #[error("{program}: {message}")]
    Io {
        /// Program name.
        program: String,
        /// OS error message.
        message: String,
    },
}

impl ProcessError {
    pub(crate) fn timed_out(program: &str, timeout: Duration) -> Self {
        Self::TimedOut { program: program.to_string(), timeout_secs: timeout.as_secs() }
    }
}

/// Classification of an [`ExecutionError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    /// The external tool is not installed.
    ToolNotFound,
    /// The external tool exceeded its time budget.
    TimedOut,
    /// The external tool exited with a non-zero status.
    NonZeroExit(i32),
    /// A delete target resolved outside the vendored module root.
    PathOutsideModuleRoot,
    /// A filesystem mutation failed.
    Filesystem,
    /// The tool could not be spawned or awaited.
    Io,
}

impl fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolNotFound => f.write_str("tool not found"),
            Self::TimedOut => f.write_str("tool timed out"),
            Self::NonZeroExit(code) => write!(f, "tool exited with status {code}"),
            Self::PathOutsideModuleRoot => f.write_str("path outside module root"),
            Self::Filesystem => f.write_str("filesystem error"),
            Self::Io => f.write_str("i/o error"),
        }
    }
}

/// Applying an action failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct ExecutionError {
    /// What kind of failure.
    pub kind: ExecutionErrorKind,
    /// Tool output or OS message.
    pub detail: String,
}

impl ExecutionError {
    /// Creates an execution error.
    pub fn new(kind: ExecutionErrorKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }

    /// Builds the error for a tool that exited non-zero.
    #[must_use]
    pub fn exit(program: &str, code: i32, stderr: &str) -> Self {
        let stderr = stderr.trim();
        let detail = if stderr.is_empty() {
            format!("{program} failed")
        } else {
            format!("{program} failed: {stderr}")
        };
        Self::new(ExecutionErrorKind::NonZeroExit(code), detail)
    }
}

impl From<ProcessError> for ExecutionError {
    fn from(err: ProcessError) -> Self {
        let kind = match &err {
            ProcessError::NotFound { .. } => ExecutionErrorKind::ToolNotFound,
            ProcessError::TimedOut { .. } => ExecutionErrorKind::TimedOut,
            ProcessError::Io { .. } => ExecutionErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}

/// Staging or committing a checkpoint failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    /// Checking whether a path is tracked failed.
    #[error("cannot inspect {}: {detail}", path.display())]
    Inspect {
        /// The path being inspected.
        path: PathBuf,
        /// Tool output.
        detail: String,
    },
    /// `git add` failed.
    #[error("staging failed: {0}")]
    Stage(String),
    /// `git commit` failed for a reason other than an empty change set.
    #[error("commit failed: {0}")]
    Commit(String),
}

/// The step of a module's migration that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Querying module state.
    Probe,
    /// Asking the operator for confirmation.
    Confirm,
    /// Deleting the vendored copy.
    Delete,
    /// Requiring the package with the dependency manager.
    Install,
    /// Removing the package with the dependency manager.
    Uninstall,
    /// Committing the action.
    Checkpoint,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Probe => "probe",
            Self::Confirm => "confirm",
            Self::Delete => "delete",
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Checkpoint => "checkpoint",
        })
    }
}

/// A failure that ends the whole run.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The module directory could not be listed.
    #[error("cannot list modules in {}: {reason}", path.display())]
    Discovery {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying error.
        reason: String,
    },
    /// A module's metadata is unusable.
    #[error(transparent)]
    Data(#[from] DataError),
    /// A status query failed.
    #[error("module {module}: {step} failed: {source}")]
    Probe {
        /// Module name.
        module: String,
        /// Step that failed.
        step: Step,
        /// Underlying probe error.
        source: ProbeError,
    },
    /// The confirmation gate could not be read.
    #[error("module {module}: {step} failed: {reason}")]
    Confirm {
        /// Module name.
        module: String,
        /// Step that failed.
        step: Step,
        /// Underlying I/O error.
        reason: String,
    },
}

impl MigrateError {
    /// Returns `true` when the run stopped because a site selector is needed.
    #[must_use]
    pub fn is_multisite(&self) -> bool {
        matches!(self, Self::Probe { source: ProbeError::MultisiteBootstrap, .. })
    }
}
