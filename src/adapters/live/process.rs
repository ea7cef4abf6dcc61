//! Live command runner using `std::process::Command`.

use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::ProcessError;
use crate::ports::process::{CommandOutput, CommandRunner, CommandSpec};

/// Live runner that spawns the program directly (no shell).
///
/// Standard input is closed so that an unexpected interactive prompt in a
/// tool fails fast instead of hanging the run.
pub struct LiveCommandRunner;

impl CommandRunner for LiveCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        debug!(command = %spec.display(), cwd = %spec.cwd.display(), "running");

        let io_error = |err: std::io::Error| ProcessError::Io {
            program: spec.program.clone(),
            message: err.to_string(),
        };

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    ProcessError::NotFound { program: spec.program.clone() }
                } else {
                    io_error(err)
                }
            })?;

        // Both pipes are drained while we wait.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match spec.timeout {
            Some(timeout) => match child.wait_timeout(timeout).map_err(io_error)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProcessError::timed_out(&spec.program, timeout));
                }
            },
            None => child.wait().map_err(io_error)?,
        };

        let output = CommandOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        debug!(command = %spec.display(), exit_code = output.exit_code, "finished");
        Ok(output)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}
