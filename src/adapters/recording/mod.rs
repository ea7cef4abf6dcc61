//! Recording adapters that capture interactions to cassettes.

pub mod filesystem;
pub mod process;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

pub use filesystem::RecordingFileSystem;
pub use process::RecordingCommandRunner;

fn to_json<T: Serialize>(value: &T, what: &str) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| panic!("failed to serialize recording {what}: {e}"))
}

fn push(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input, output);
}

/// Record an interaction with a plain (infallible) return value.
///
/// Mirror of the replaying side, which reads the value back verbatim.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    push(recorder, port, method, to_json(input, "input"), to_json(output, "output"));
}

/// Record a `Result` whose error only needs to survive as a message.
///
/// Convention: `Ok(v)` is stored as `{"ok": v}`, `Err(e)` as `{"err": "<e>"}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": to_json(v, "output") }),
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };
    push(recorder, port, method, to_json(input, "input"), output);
}

/// Record a `Result` whose error must be reconstructed exactly on replay.
///
/// Same `ok`/`err` envelope as [`record_result`], but the error is stored
/// as structured JSON instead of its message.
pub(crate) fn record_typed_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": to_json(v, "output") }),
        Err(e) => serde_json::json!({ "err": to_json(e, "error") }),
    };
    push(recorder, port, method, to_json(input, "input"), output);
}
