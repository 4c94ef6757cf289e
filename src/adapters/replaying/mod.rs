//! Replaying adapters: serve recorded interactions back from a cassette.
//!
//! Every adapter owns its own [`CassetteReplayer`] so per-port cursors are
//! independent. Running past the end of a recording panics with the pairs
//! still available; replay is a test harness, not a production path.

pub mod filesystem;
pub mod host;
pub mod llm;
pub mod system;

pub use filesystem::ReplayingFileSystem;
pub use host::ReplayingHost;
pub use llm::ReplayingLlmClient;
pub use system::{ReplayingClock, ReplayingIdGenerator};

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

/// Takes the output of the next recorded `port::method` call.
pub(crate) fn next_output(replayer: &Mutex<CassetteReplayer>, port: &str, method: &str) -> Value {
    let mut replayer = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    replayer.next_interaction(port, method).output
}

/// Decodes a plain recorded value.
///
/// # Panics
///
/// Panics if the cassette holds a value of the wrong shape.
pub(crate) fn replay_value<T: DeserializeOwned>(output: Value, context: &str) -> T {
    serde_json::from_value(output)
        .unwrap_or_else(|e| panic!("{context}: cassette output has the wrong shape: {e}"))
}

/// Decodes a recorded `{"ok": value}` / `{"err": message}` envelope.
pub(crate) fn replay_result<T: DeserializeOwned>(output: Value, context: &str) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let ok = output.get("ok").cloned().unwrap_or(Value::Null);
    serde_json::from_value(ok).map_err(|e| format!("{context}: failed to decode recorded value: {e}").into())
}
