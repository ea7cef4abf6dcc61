//! In-memory fakes for every port, shared by the unit tests.
//!
//! Fakes that mutate something append a line to a shared [`CallLog`] so
//! tests can assert on the order of side effects across ports.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::{CheckpointError, ExecutionError, ExecutionErrorKind, ProbeError, ProcessError};
use crate::ports::{
    ApplicationRuntime, CommandOutput, CommandRunner, CommandSpec, CommitOutcome, Confirm,
    DependencyManager, DependencyManifest, FileSystem, RuntimeModule, VersionControl,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ordered record of side effects, shared between fakes.
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn push(log: &CallLog, entry: String) {
    log.lock().unwrap().push(entry);
}

/// Project root used by every harness-built context.
pub const PROJECT: &str = "/srv/site";

/// Default run config for tests.
pub fn config() -> RunConfig {
    RunConfig::new(PROJECT)
}

// --- FileSystem ---

#[derive(Default)]
struct MemFsState {
    files: HashMap<PathBuf, String>,
    dirs: Vec<PathBuf>,
}

/// In-memory filesystem. Directories list in insertion order.
#[derive(Default)]
pub struct MemFs {
    state: Mutex<MemFsState>,
    remove_error: Option<String>,
    log: CallLog,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Adds a directory and any missing ancestors.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path.as_ref());
        self
    }

    /// Adds a file and its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.state.lock().unwrap().files.insert(path.to_path_buf(), contents.to_string());
        self
    }

    /// Makes every `remove_dir_all` fail with `message`.
    pub fn failing_removal(mut self, message: &str) -> Self {
        self.remove_error = Some(message.to_string());
        self
    }

    fn add_dir(&self, path: &Path) {
        let mut state = self.state.lock().unwrap();
        let mut missing: Vec<PathBuf> = path
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty() && !state.dirs.iter().any(|d| d == a))
            .map(Path::to_path_buf)
            .collect();
        missing.reverse();
        state.dirs.extend(missing);
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, BoxError> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("{}: No such file or directory", path.display()).into())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.iter().any(|d| d == path)
    }

    fn list_dirs(&self, path: &Path) -> Result<Vec<String>, BoxError> {
        let state = self.state.lock().unwrap();
        if !state.dirs.iter().any(|d| d == path) {
            return Err(format!("{}: No such file or directory", path.display()).into());
        }
        Ok(state
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(path))
            .filter_map(|d| d.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), BoxError> {
        push(&self.log, format!("fs remove {}", path.display()));
        if let Some(message) = &self.remove_error {
            return Err(message.clone().into());
        }
        let mut state = self.state.lock().unwrap();
        state.dirs.retain(|d| !d.starts_with(path));
        state.files.retain(|f, _| !f.starts_with(path));
        Ok(())
    }
}

// --- CommandRunner ---

/// Serves queued command results in order and records every spec it saw.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<CommandOutput, ProcessError>>>,
    seen: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn then(self, response: Result<CommandOutput, ProcessError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Queues a successful run printing `stdout`.
    pub fn ok(self, stdout: &str) -> Self {
        self.then(Ok(CommandOutput { exit_code: 0, stdout: stdout.into(), stderr: String::new() }))
    }

    /// Queues a non-zero exit printing `stderr`.
    pub fn fail(self, code: i32, stderr: &str) -> Self {
        self.then(Ok(CommandOutput { exit_code: code, stdout: String::new(), stderr: stderr.into() }))
    }

    /// Queues a non-zero exit printing `stdout`.
    pub fn fail_with_stdout(self, code: i32, stdout: &str) -> Self {
        self.then(Ok(CommandOutput { exit_code: code, stdout: stdout.into(), stderr: String::new() }))
    }

    /// Queues a process-level failure.
    pub fn error(self, err: ProcessError) -> Self {
        self.then(Err(err))
    }

    pub fn seen(&self) -> Vec<CommandSpec> {
        self.seen.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        self.seen.lock().unwrap().push(spec.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedRunner exhausted at `{}`", spec.display()))
    }
}

// --- DependencyManifest ---

/// Manifest backed by a package → constraint map.
#[derive(Default)]
pub struct FakeManifest {
    required: HashMap<String, String>,
    error: Option<String>,
}

impl FakeManifest {
    pub fn with(mut self, package: &str, constraint: &str) -> Self {
        self.required.insert(package.into(), constraint.into());
        self
    }

    pub fn failing(mut self, detail: &str) -> Self {
        self.error = Some(detail.into());
        self
    }
}

impl DependencyManifest for FakeManifest {
    fn required_version(&self, _config: &RunConfig, package: &str) -> Result<Option<String>, ProbeError> {
        if let Some(detail) = &self.error {
            return Err(ProbeError::manifest(detail.clone()));
        }
        Ok(self.required.get(package).cloned())
    }
}

// --- ApplicationRuntime ---

/// Runtime backed by a module → status map.
#[derive(Default)]
pub struct FakeRuntime {
    modules: HashMap<String, RuntimeModule>,
    multisite: bool,
    probe_error: Option<String>,
    cache_error: Option<String>,
    log: CallLog,
}

impl FakeRuntime {
    pub fn with_module(mut self, name: &str, status: &str, version: Option<&str>) -> Self {
        self.modules.insert(
            name.into(),
            RuntimeModule { status: status.into(), version: version.map(Into::into) },
        );
        self
    }
}

impl ApplicationRuntime for FakeRuntime {
    fn module_info(&self, _config: &RunConfig, module: &str) -> Result<Option<RuntimeModule>, ProbeError> {
        if self.multisite {
            return Err(ProbeError::MultisiteBootstrap);
        }
        if let Some(detail) = &self.probe_error {
            return Err(ProbeError::runtime(detail.clone()));
        }
        Ok(self.modules.get(module).cloned())
    }

    fn rebuild_cache(&self, _config: &RunConfig) -> Result<(), ExecutionError> {
        push(&self.log, "drush cr".into());
        match &self.cache_error {
            Some(detail) => Err(ExecutionError::exit("drush cr", 1, detail)),
            None => Ok(()),
        }
    }
}

// --- DependencyManager ---

/// Records require/remove calls; can fail for one package.
#[derive(Default)]
pub struct FakeDependencyManager {
    failing_package: Option<(String, ExecutionError)>,
    log: CallLog,
}

impl FakeDependencyManager {
    fn outcome(&self, package: &str) -> Result<(), ExecutionError> {
        match &self.failing_package {
            Some((failing, err)) if failing == package => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

impl DependencyManager for FakeDependencyManager {
    fn require(&self, _config: &RunConfig, package: &str, constraint: &str) -> Result<(), ExecutionError> {
        push(&self.log, format!("composer require {package}:{constraint}"));
        self.outcome(package)
    }

    fn remove(&self, _config: &RunConfig, package: &str) -> Result<(), ExecutionError> {
        push(&self.log, format!("composer remove {package}"));
        self.outcome(package)
    }
}

// --- VersionControl ---

/// Git stand-in that tracks a fixed set of paths.
#[derive(Default)]
pub struct FakeVcs {
    tracked: HashSet<PathBuf>,
    nothing_to_commit: bool,
    commit_error: Option<String>,
    commits: Mutex<u32>,
    log: CallLog,
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" ")
}

impl VersionControl for FakeVcs {
    fn is_tracked(&self, _config: &RunConfig, path: &Path) -> Result<bool, CheckpointError> {
        Ok(self.tracked.iter().any(|t| t.starts_with(path)))
    }

    fn stage(&self, _config: &RunConfig, paths: &[PathBuf]) -> Result<(), CheckpointError> {
        push(&self.log, format!("git add {}", join_paths(paths)));
        Ok(())
    }

    fn commit(&self, _config: &RunConfig, message: &str, paths: &[PathBuf]) -> Result<CommitOutcome, CheckpointError> {
        push(&self.log, format!("git commit {message} -- {}", join_paths(paths)));
        if let Some(detail) = &self.commit_error {
            return Err(CheckpointError::Commit(detail.clone()));
        }
        if self.nothing_to_commit {
            return Ok(CommitOutcome::NothingToCommit);
        }
        let mut count = self.commits.lock().unwrap();
        *count += 1;
        Ok(CommitOutcome::Committed { commit: format!("c0ffee{count}") })
    }
}

// --- Confirm ---

/// Answers questions from a queue, then with a fallback answer.
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    log: CallLog,
}

impl Default for ScriptedConfirm {
    fn default() -> Self {
        Self { answers: Mutex::new(VecDeque::new()), fallback: true, log: CallLog::default() }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> Result<bool, BoxError> {
        push(&self.log, format!("confirm {question}"));
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(self.fallback))
    }
}

// --- Harness ---

/// Builds a [`ServiceContext`] from fakes sharing one [`CallLog`].
///
/// Modules are added under `/srv/site/sites/all/modules` in call order.
pub struct Harness {
    fs: MemFs,
    manifest: FakeManifest,
    runtime: FakeRuntime,
    packages: FakeDependencyManager,
    vcs: FakeVcs,
    confirm: ScriptedConfirm,
    log: CallLog,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            fs: MemFs::new().with_log(Arc::clone(&log)).with_dir(config().modules_root()),
            manifest: FakeManifest::default(),
            runtime: FakeRuntime { log: Arc::clone(&log), ..FakeRuntime::default() },
            packages: FakeDependencyManager { log: Arc::clone(&log), ..FakeDependencyManager::default() },
            vcs: FakeVcs { log: Arc::clone(&log), ..FakeVcs::default() },
            confirm: ScriptedConfirm { log: Arc::clone(&log), ..ScriptedConfirm::default() },
            log,
        }
    }

    /// Vendors `name` on disk with an info file declaring `version`.
    pub fn vendored(mut self, name: &str, version: &str) -> Self {
        let info = format!("name: {name}\ntype: module\nversion: '{version}'\n");
        self.fs = self.fs.with_file(Self::module_dir(name).join(format!("{name}.info.yml")), &info);
        self
    }

    /// Adds a raw file below the project root.
    pub fn file(mut self, relative: &str, contents: &str) -> Self {
        self.fs = self.fs.with_file(Path::new(PROJECT).join(relative), contents);
        self
    }

    /// Declares `drupal/<name>` in the manifest.
    pub fn managed(mut self, name: &str, constraint: &str) -> Self {
        self.manifest = self.manifest.with(&format!("drupal/{name}"), constraint);
        self
    }

    /// Reports `name` to the runtime with `status`.
    pub fn activation(mut self, name: &str, status: &str) -> Self {
        self.runtime = self.runtime.with_module(name, status, None);
        self
    }

    pub fn tracked(mut self, relative: &str) -> Self {
        self.vcs.tracked.insert(PathBuf::from(relative));
        self
    }

    pub fn multisite(mut self) -> Self {
        self.runtime.multisite = true;
        self
    }

    pub fn runtime_error(mut self, detail: &str) -> Self {
        self.runtime.probe_error = Some(detail.into());
        self
    }

    pub fn manifest_error(mut self, detail: &str) -> Self {
        self.manifest = self.manifest.failing(detail);
        self
    }

    pub fn cache_error(mut self, detail: &str) -> Self {
        self.runtime.cache_error = Some(detail.into());
        self
    }

    pub fn removal_error(mut self, message: &str) -> Self {
        self.fs = self.fs.failing_removal(message);
        self
    }

    /// Makes composer fail with a non-zero exit for `drupal/<name>`.
    pub fn composer_fails_for(mut self, name: &str, stderr: &str) -> Self {
        let err = ExecutionError::new(ExecutionErrorKind::NonZeroExit(2), stderr);
        self.packages.failing_package = Some((format!("drupal/{name}"), err));
        self
    }

    pub fn nothing_to_commit(mut self) -> Self {
        self.vcs.nothing_to_commit = true;
        self
    }

    pub fn commit_error(mut self, detail: &str) -> Self {
        self.vcs.commit_error = Some(detail.into());
        self
    }

    /// Queues confirmation answers; unanswered questions are confirmed.
    pub fn answers(self, answers: &[bool]) -> Self {
        self.confirm.answers.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn module_dir(name: &str) -> PathBuf {
        config().modules_root().join(name)
    }

    pub fn build(self) -> (ServiceContext, CallLog) {
        let ctx = ServiceContext {
            fs: Arc::new(self.fs),
            manifest: Box::new(self.manifest),
            runtime: Box::new(self.runtime),
            packages: Box::new(self.packages),
            vcs: Box::new(self.vcs),
            confirm: Box::new(self.confirm),
        };
        (ctx, self.log)
    }
}

/// Snapshot of the log entries.
pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
