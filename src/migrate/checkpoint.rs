//! Path-scoped git commits after each applied action.

use std::path::PathBuf;

use tracing::info;

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::error::CheckpointError;
use crate::ports::CommitOutcome;

/// A commit recorded during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRecord {
    /// Position within the run, starting at 1.
    pub sequence: u64,
    /// Commit message.
    pub message: String,
    /// Paths that were staged.
    pub paths: Vec<PathBuf>,
    /// Commit hash.
    pub commit: String,
}

/// Result of a checkpoint attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointOutcome {
    /// A commit was created.
    Committed(CheckpointRecord),
    /// The paths held no changes.
    NothingToCommit,
}

/// Commits action paths and numbers the resulting checkpoints.
#[derive(Debug)]
pub struct Checkpointer {
    next_sequence: u64,
}

impl Default for Checkpointer {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkpointer {
    /// Creates a checkpointer whose first record is sequence 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next_sequence: 1 }
    }

    /// Stages exactly `paths` and commits them with `message`.
    ///
    /// Paths that neither exist nor are tracked are left out. If nothing
    /// remains, or git finds no change, the outcome is
    /// [`CheckpointOutcome::NothingToCommit`].
    ///
    /// # Errors
    ///
    /// Returns a [`CheckpointError`] if inspecting, staging or committing fails.
    pub fn commit(
        &mut self,
        ctx: &ServiceContext,
        config: &RunConfig,
        message: &str,
        paths: &[PathBuf],
    ) -> Result<CheckpointOutcome, CheckpointError> {
        let mut scoped = Vec::with_capacity(paths.len());
        for path in paths {
            if ctx.fs.exists(&config.resolve(path)) || ctx.vcs.is_tracked(config, path)? {
                scoped.push(path.clone());
            }
        }
        if scoped.is_empty() {
            info!(message, "nothing to commit");
            return Ok(CheckpointOutcome::NothingToCommit);
        }

        ctx.vcs.stage(config, &scoped)?;
        match ctx.vcs.commit(config, message, &scoped)? {
            CommitOutcome::NothingToCommit => {
                info!(message, "nothing to commit");
                Ok(CheckpointOutcome::NothingToCommit)
            }
            CommitOutcome::Committed { commit } => {
                let record = CheckpointRecord {
                    sequence: self.next_sequence,
                    message: message.to_string(),
                    paths: scoped,
                    commit,
                };
                self.next_sequence += 1;
                info!(sequence = record.sequence, commit = %record.commit, message, "committed");
                Ok(CheckpointOutcome::Committed(record))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config, entries, Harness};

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn install_commit_is_scoped_to_dependency_paths() {
        let (ctx, log) = Harness::new()
            .file("composer.json", "{}")
            .file("composer.lock", "{}")
            .file("libraries/chosen/chosen.js", "")
            .file("sites/default/settings.php", "<?php")
            .build();
        let mut checkpointer = Checkpointer::new();

        let outcome = checkpointer
            .commit(&ctx, &config(), "Install drupal/token:^1.5", &config().dependency_paths())
            .unwrap();

        let CheckpointOutcome::Committed(record) = outcome else { panic!("expected a commit") };
        assert_eq!(record.sequence, 1);
        assert_eq!(record.paths, paths(&["composer.json", "composer.lock", "libraries"]));
        assert_eq!(
            entries(&log),
            vec![
                "git add composer.json composer.lock libraries",
                "git commit Install drupal/token:^1.5 -- composer.json composer.lock libraries",
            ]
        );
    }

    #[test]
    fn untracked_absent_paths_are_dropped() {
        let (ctx, log) = Harness::new().file("composer.json", "{}").file("composer.lock", "{}").build();
        let mut checkpointer = Checkpointer::new();

        checkpointer.commit(&ctx, &config(), ":fire: Uninstall token", &config().dependency_paths()).unwrap();

        assert_eq!(entries(&log)[0], "git add composer.json composer.lock");
    }

    #[test]
    fn deleted_tracked_directory_is_still_staged() {
        let (ctx, log) = Harness::new().tracked("sites/all/modules/token/token.info.yml").build();
        let mut checkpointer = Checkpointer::new();

        let outcome = checkpointer
            .commit(&ctx, &config(), ":fire: Remove sites/all/modules/token", &paths(&["sites/all/modules/token"]))
            .unwrap();

        assert!(matches!(outcome, CheckpointOutcome::Committed(_)));
        assert_eq!(entries(&log)[0], "git add sites/all/modules/token");
    }

    #[test]
    fn never_tracked_absent_directory_has_nothing_to_commit() {
        let (ctx, log) = Harness::new().build();
        let outcome = Checkpointer::new()
            .commit(&ctx, &config(), ":fire: Remove sites/all/modules/token", &paths(&["sites/all/modules/token"]))
            .unwrap();
        assert_eq!(outcome, CheckpointOutcome::NothingToCommit);
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn unchanged_paths_are_a_noop_not_an_error() {
        let (ctx, _) = Harness::new().file("composer.json", "{}").nothing_to_commit().build();
        let mut checkpointer = Checkpointer::new();

        let outcome = checkpointer.commit(&ctx, &config(), "Install drupal/token:^1.5", &paths(&["composer.json"]));

        assert_eq!(outcome.unwrap(), CheckpointOutcome::NothingToCommit);
    }

    #[test]
    fn commit_failure_is_a_checkpoint_error() {
        let (ctx, _) = Harness::new().file("composer.json", "{}").commit_error("unable to auto-detect email").build();
        let err = Checkpointer::new()
            .commit(&ctx, &config(), "Install drupal/token:^1.5", &paths(&["composer.json"]))
            .unwrap_err();
        assert!(matches!(err, CheckpointError::Commit(ref detail) if detail.contains("email")));
    }

    #[test]
    fn sequence_increases_per_commit() {
        let (ctx, _) = Harness::new().file("composer.json", "{}").build();
        let mut checkpointer = Checkpointer::new();
        let scope = paths(&["composer.json"]);

        let sequences: Vec<u64> = (0..3)
            .map(|_| match checkpointer.commit(&ctx, &config(), "msg", &scope).unwrap() {
                CheckpointOutcome::Committed(record) => record.sequence,
                CheckpointOutcome::NothingToCommit => 0,
            })
            .collect();

        assert_eq!(sequences, vec![1, 2, 3]);
    }
}
