//! Subprocess port for running external tools.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

/// A single external-tool invocation.
///
/// Programs are executed directly with an argument vector, never through a
/// shell, so module names and constraints are passed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute (looked up on `PATH`).
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: PathBuf,
    /// Time budget; `None` waits until the program exits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Creates an invocation of `program` in `cwd` with no arguments.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: cwd.into(), timeout: None }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the time budget.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Renders the invocation for logs and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The output of a program that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` if the program exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external programs.
///
/// A non-zero exit is not an error at this level: it is reported through
/// [`CommandOutput::exit_code`] so that callers can inspect the output.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotFound`] if the program does not exist,
    /// [`ProcessError::TimedOut`] if it exceeded its budget, and
    /// [`ProcessError::Io`] for any other spawn or wait failure.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError>;
}
