//! Replaying adapter for the `CommandRunner` port.

use std::sync::Mutex;

use super::{decode_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::ProcessError;
use crate::ports::{CommandOutput, CommandRunner, CommandSpec};

/// Replays recorded command results from a cassette.
///
/// No program is spawned. Invocations are served strictly in recorded order.
pub struct ReplayingCommandRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingCommandRunner {
    /// Creates a new replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl CommandRunner for ReplayingCommandRunner {
    fn run(&self, _spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let output = next_output(&self.replayer, "process", "run");
        decode_result(&output, "process::run")
    }
}
