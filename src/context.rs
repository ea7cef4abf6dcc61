//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::composer::{ComposerCli, ComposerManifest};
use crate::adapters::live::drush::DrushRuntime;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::GitCli;
use crate::adapters::live::process::LiveCommandRunner;
use crate::adapters::live::prompt::StdinConfirm;
use crate::adapters::recording::{RecordingCommandRunner, RecordingFileSystem};
use crate::adapters::replaying::{ReplayingCommandRunner, ReplayingFileSystem};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::error::ProcessError;
use crate::ports::{
    ApplicationRuntime, CommandOutput, CommandRunner, CommandSpec, Confirm, DependencyManager,
    DependencyManifest, FileSystem, VersionControl,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying);
/// tests assemble the struct directly from fakes.
pub struct ServiceContext {
    /// Filesystem for discovery, info files and deletes.
    pub fs: Arc<dyn FileSystem>,
    /// Dependency manifest (`composer.json`).
    pub manifest: Box<dyn DependencyManifest>,
    /// Application runtime (drush).
    pub runtime: Box<dyn ApplicationRuntime>,
    /// Dependency manager (composer).
    pub packages: Box<dyn DependencyManager>,
    /// Version control (git).
    pub vcs: Box<dyn VersionControl>,
    /// Operator confirmation gate.
    pub confirm: Box<dyn Confirm>,
}

impl ServiceContext {
    /// Creates a live context: real disk, real tools, stdin prompts.
    #[must_use]
    pub fn live() -> Self {
        Self::over(Arc::new(LiveFileSystem), Arc::new(LiveCommandRunner))
    }

    /// Builds the composer, drush and git adapters on top of the given
    /// filesystem and command runner.
    #[must_use]
    pub fn over(fs: Arc<dyn FileSystem>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            manifest: Box::new(ComposerManifest::new(Arc::clone(&fs))),
            fs,
            runtime: Box::new(DrushRuntime::new(Arc::clone(&runner))),
            packages: Box::new(ComposerCli::new(Arc::clone(&runner))),
            vcs: Box::new(GitCli::new(runner)),
            confirm: Box::new(StdinConfirm::new()),
        }
    }

    /// Replaces the confirmation gate.
    #[must_use]
    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Creates a live context whose filesystem and subprocess calls are
    /// recorded into a new session below `base`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(
        base: &Path,
        project_root: &Path,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base, project_root)?;
        let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&session.fs));
        let runner =
            RecordingCommandRunner::new(Box::new(LiveCommandRunner), Arc::clone(&session.process));
        Ok((Self::over(Arc::new(fs), Arc::new(runner)), session))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette use a panicking adapter that
    /// fails with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        let fs: Arc<dyn FileSystem> = match replayers.fs {
            Some(r) => Arc::new(ReplayingFileSystem::new(r)),
            None => Arc::new(PanickingFileSystem),
        };
        let runner: Arc<dyn CommandRunner> = match replayers.process {
            Some(r) => Arc::new(ReplayingCommandRunner::new(r)),
            None => Arc::new(PanickingCommandRunner),
        };
        Ok(Self::over(fs, runner))
    }
}

// --- Panicking adapters for unspecified ports ---

const NOT_CONFIGURED: &str = "port not configured in CassetteConfig";

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem {NOT_CONFIGURED}: no cassette loaded for fs");
    }
    fn exists(&self, _path: &Path) -> bool {
        panic!("FileSystem {NOT_CONFIGURED}: no cassette loaded for fs");
    }
    fn list_dirs(
        &self,
        _path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem {NOT_CONFIGURED}: no cassette loaded for fs");
    }
    fn remove_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem {NOT_CONFIGURED}: no cassette loaded for fs");
    }
}

struct PanickingCommandRunner;
impl CommandRunner for PanickingCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        panic!("CommandRunner {NOT_CONFIGURED}: no cassette loaded for process ({})", spec.display());
    }
}
