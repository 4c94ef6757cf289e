//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::{GitHubHost, LiveClock, LiveFileSystem, LiveIdGenerator, LiveLlmClient};
use crate::adapters::recording::{
    RecordingClock, RecordingFileSystem, RecordingHost, RecordingIdGenerator, RecordingLlmClient,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingFileSystem, ReplayingHost, ReplayingIdGenerator, ReplayingLlmClient,
};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::LensConfig;
use crate::ports::{Clock, FileSystem, IdGenerator, LlmClient, RepoHost};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem used by the project store.
    pub fs: Box<dyn FileSystem>,
    /// Repository host for trees, file text and statistics.
    pub host: Box<dyn RepoHost>,
    /// LLM client for analysis and questions.
    pub llm: Box<dyn LlmClient>,
    /// ID generator for project identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Cassette being recorded; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context talking to GitHub, Anthropic and the local disk.
    #[must_use]
    pub fn live(config: &LensConfig) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            host: Box::new(GitHubHost::new(config.github_token.clone())),
            llm: Box::new(LiveLlmClient::new(config.llm.api_key.clone())),
            id_gen: Box::new(LiveIdGenerator),
            recorder: None,
        }
    }

    /// Creates a live context that also records every port call, writing the
    /// cassette to `path` when the context is dropped.
    ///
    /// This is the developer-only mechanism behind `DEVLENS_RECORD`.
    #[must_use]
    pub fn recording(path: &Path, config: &LensConfig) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "devlens-session", "")));
        info!(cassette = %path.display(), "recording session");

        let host = GitHubHost::new(config.github_token.clone());
        let llm = LiveLlmClient::new(config.llm.api_key.clone());
        Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            fs: Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder))),
            host: Box::new(RecordingHost::new(Box::new(host), Arc::clone(&recorder))),
            llm: Box::new(RecordingLlmClient::new(Box::new(llm), Arc::clone(&recorder))),
            id_gen: Box::new(RecordingIdGenerator::new(Box::new(LiveIdGenerator), Arc::clone(&recorder))),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an in-memory cassette.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::for_port(cassette, "clock"))),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::for_port(cassette, "fs"))),
            host: Box::new(ReplayingHost::new(CassetteReplayer::for_port(cassette, "host"))),
            llm: Box::new(ReplayingLlmClient::new(CassetteReplayer::for_port(cassette, "llm"))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::for_port(cassette, "id_gen"))),
            recorder: None,
        }
    }

    /// Labels the cassette being recorded, if any, with the repository slug.
    pub fn label_recording(&self, source: &str) {
        if let Some(recorder) = &self.recorder {
            recorder.lock().unwrap_or_else(PoisonError::into_inner).set_source(source);
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            match guard.save() {
                Ok(path) => info!(cassette = %path.display(), interactions = guard.len(), "cassette written"),
                Err(e) => warn!("failed to write cassette: {e}"),
            }
        }
    }
}
