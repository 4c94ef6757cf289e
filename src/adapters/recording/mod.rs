//! Recording adapters: delegate to an inner port and capture every call
//! into a shared cassette recorder.

pub mod filesystem;
pub mod host;
pub mod llm;
pub mod system;

pub use filesystem::RecordingFileSystem;
pub use host::RecordingHost;
pub use llm::RecordingLlmClient;
pub use system::{RecordingClock, RecordingIdGenerator};

use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cassette::recorder::CassetteRecorder;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "unserializable": e.to_string() }))
}

/// Records a call whose result cannot fail.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize + ?Sized,
    O: Serialize + ?Sized,
{
    let (input, output) = (to_json(input), to_json(output));
    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(port, method, input, output);
}

/// Records a fallible call as `{"ok": value}` or `{"err": message}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Display,
    I: Serialize + ?Sized,
{
    let output = match result {
        Ok(value) => json!({ "ok": to_json(value) }),
        Err(e) => json!({ "err": e.to_string() }),
    };
    let input = to_json(input);
    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(port, method, input, output);
}

#[cfg(test)]
pub(crate) fn shared_recorder(name: &str) -> Arc<Mutex<CassetteRecorder>> {
    let path = std::env::temp_dir().join(format!("devlens_{name}.cassette.yaml"));
    Arc::new(Mutex::new(CassetteRecorder::new(path, name, "acme/widgets")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;

    #[test]
    fn results_use_ok_err_envelope() {
        let recorder = shared_recorder("envelope");
        let ok: Result<u32, PortError> = Ok(7);
        let err: Result<u32, PortError> = Err("boom".into());
        record_result(&recorder, "fs", "list_dir", &json!({"path": "a"}), &ok);
        record_result(&recorder, "fs", "list_dir", &json!({"path": "b"}), &err);
        record_interaction(&recorder, "fs", "exists", &json!({"path": "c"}), &true);

        let guard = recorder.lock().unwrap();
        assert_eq!(guard.len(), 3);
        drop(guard);
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        let path = recorder.finish().unwrap();
        let cassette: crate::cassette::format::Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.interactions[0].output, json!({"ok": 7}));
        assert_eq!(cassette.interactions[1].output, json!({"err": "boom"}));
        assert_eq!(cassette.interactions[2].output, json!(true));
        let _ = std::fs::remove_file(path);
    }
}
