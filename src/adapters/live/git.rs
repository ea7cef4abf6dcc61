//! Live git adapter using `git` CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RunConfig;
use crate::error::CheckpointError;
use crate::ports::git::{CommitOutcome, VersionControl};
use crate::ports::{CommandOutput, CommandRunner, CommandSpec};

/// Phrases git uses when a commit would record no changes.
const EMPTY_COMMIT_MARKERS: [&str; 3] =
    ["nothing to commit", "nothing added to commit", "no changes added to commit"];

/// Live git adapter that shells out to the `git` CLI through a runner.
pub struct GitCli {
    runner: Arc<dyn CommandRunner>,
}

impl GitCli {
    /// Creates a git adapter over the given command runner.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn git<I, S>(&self, config: &RunConfig, args: I) -> Result<(CommandSpec, CommandOutput), String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec =
            CommandSpec::new("git", &config.project_root).args(args).timeout(config.tool_timeout);
        let output = self.runner.run(&spec).map_err(|e| e.to_string())?;
        Ok((spec, output))
    }
}

fn pathspecs(paths: &[PathBuf]) -> impl Iterator<Item = String> + '_ {
    paths.iter().map(|p| p.display().to_string())
}

fn failure(spec: &CommandSpec, output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    let detail = if stderr.is_empty() { output.stdout.trim() } else { stderr };
    format!("{} exited with status {}: {detail}", spec.display(), output.exit_code)
}

impl VersionControl for GitCli {
    fn is_tracked(&self, config: &RunConfig, path: &Path) -> Result<bool, CheckpointError> {
        let inspect = |detail: String| CheckpointError::Inspect { path: path.to_path_buf(), detail };
        let (spec, output) = self
            .git(config, ["ls-files".to_string(), "--".to_string(), path.display().to_string()])
            .map_err(inspect)?;
        if !output.success() {
            return Err(inspect(failure(&spec, &output)));
        }
        Ok(!output.stdout.trim().is_empty())
    }

    fn stage(&self, config: &RunConfig, paths: &[PathBuf]) -> Result<(), CheckpointError> {
        let args = ["add".to_string(), "--all".to_string(), "--".to_string()]
            .into_iter()
            .chain(pathspecs(paths));
        let (spec, output) = self.git(config, args).map_err(CheckpointError::Stage)?;
        if !output.success() {
            return Err(CheckpointError::Stage(failure(&spec, &output)));
        }
        Ok(())
    }

    fn commit(
        &self,
        config: &RunConfig,
        message: &str,
        paths: &[PathBuf],
    ) -> Result<CommitOutcome, CheckpointError> {
        // `-- <paths>` commits only these paths, leaving anything else that
        // happens to be staged out of the checkpoint.
        let args = ["commit".to_string(), "-m".to_string(), message.to_string(), "--".to_string()]
            .into_iter()
            .chain(pathspecs(paths));
        let (spec, output) = self.git(config, args).map_err(CheckpointError::Commit)?;

        if !output.success() {
            let text = format!("{}\n{}", output.stdout, output.stderr);
            if EMPTY_COMMIT_MARKERS.iter().any(|marker| text.contains(marker)) {
                return Ok(CommitOutcome::NothingToCommit);
            }
            return Err(CheckpointError::Commit(failure(&spec, &output)));
        }

        let (spec, head) = self.git(config, ["rev-parse", "HEAD"]).map_err(CheckpointError::Commit)?;
        if !head.success() {
            return Err(CheckpointError::Commit(failure(&spec, &head)));
        }
        Ok(CommitOutcome::Committed { commit: head.stdout.trim().to_string() })
    }
}
