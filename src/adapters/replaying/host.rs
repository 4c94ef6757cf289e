//! Replaying adapter for the `RepoHost` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{HostFuture, RepoHost, RepoRef};

/// Serves recorded host responses.
pub struct ReplayingHost {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHost {
    /// Creates a replaying host.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T>(&self, method: &'static str) -> HostFuture<'_, T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let output = next_output(&self.replayer, "host", method);
        Box::pin(async move { replay_result(output, &format!("host::{method}")) })
    }
}

impl RepoHost for ReplayingHost {
    fn fetch_tree(&self, _repo: &RepoRef, _branch: &str) -> HostFuture<'_, serde_json::Value> {
        self.replay("fetch_tree")
    }

    fn fetch_file(&self, _repo: &RepoRef, _path: &str) -> HostFuture<'_, String> {
        self.replay("fetch_file")
    }

    fn fetch_commit_activity(&self, _repo: &RepoRef) -> HostFuture<'_, serde_json::Value> {
        self.replay("fetch_commit_activity")
    }

    fn fetch_contributors(&self, _repo: &RepoRef) -> HostFuture<'_, serde_json::Value> {
        self.replay("fetch_contributors")
    }
}
