//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod process;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

pub use filesystem::ReplayingFileSystem;
pub use process::ReplayingCommandRunner;

/// Takes the output of the next `port::method` interaction.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Splits an `{"ok": ..}` / `{"err": ..}` envelope and decodes the halves.
///
/// A bare value without an envelope is treated as `ok`.
pub(crate) fn decode_result<T, E>(output: &serde_json::Value, context: &str) -> Result<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    if let Some(err) = output.get("err") {
        return Err(serde_json::from_value(err.clone())
            .unwrap_or_else(|e| panic!("{context}: cannot decode recorded error: {e}")));
    }
    let value = output.get("ok").unwrap_or(output);
    Ok(serde_json::from_value(value.clone())
        .unwrap_or_else(|e| panic!("{context}: cannot decode recorded output: {e}")))
}
