//! Replaying adapter for the `LlmClient` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Serves recorded completions.
pub struct ReplayingLlmClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingLlmClient {
    /// Creates a replaying client.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        let output = next_output(&self.replayer, "llm", "complete");
        Box::pin(async move { replay_result(output, "llm::complete") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest { model: "m".into(), system: None, prompt: "p".into(), max_tokens: 1 }
    }

    #[tokio::test]
    async fn serves_completion_and_failure() {
        let mut cassette = Cassette::new("test", "");
        cassette.push(
            "llm",
            "complete",
            json!({}),
            json!({"ok": {"text": "{}", "prompt_tokens": 10, "completion_tokens": 2}}),
        );
        cassette.push("llm", "complete", json!({}), json!({"err": "rate limited"}));
        let llm = ReplayingLlmClient::new(CassetteReplayer::new(&cassette));

        let first = llm.complete(&request()).await.unwrap();
        assert_eq!(first.prompt_tokens, 10);
        let second = llm.complete(&request()).await.unwrap_err();
        assert_eq!(second.to_string(), "rate limited");
    }
}
