//! Recording adapter for the `CommandRunner` port.

use std::sync::{Arc, Mutex};

use super::record_typed_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::ProcessError;
use crate::ports::{CommandOutput, CommandRunner, CommandSpec};

/// Records every invocation and its outcome while delegating to an inner runner.
pub struct RecordingCommandRunner {
    inner: Box<dyn CommandRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCommandRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn CommandRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let result = self.inner.run(spec);
        record_typed_result(&self.recorder, "process", "run", spec, &result);
        result
    }
}
