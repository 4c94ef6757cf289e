//! Recording adapter for the `RepoHost` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{HostFuture, RepoHost, RepoRef};

/// Records host responses while delegating to an inner host. Tokens are
/// never written: `RepoRef` skips them on serialization.
pub struct RecordingHost {
    inner: Box<dyn RepoHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHost {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn RepoHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct TreeInput<'a> {
    repo: &'a RepoRef,
    branch: &'a str,
}

#[derive(Serialize)]
struct FileInput<'a> {
    repo: &'a RepoRef,
    path: &'a str,
}

#[derive(Serialize)]
struct RepoInput<'a> {
    repo: &'a RepoRef,
}

impl RepoHost for RecordingHost {
    fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> HostFuture<'_, serde_json::Value> {
        let repo = repo.clone();
        let branch = branch.to_string();
        Box::pin(async move {
            let result = self.inner.fetch_tree(&repo, &branch).await;
            let input = TreeInput { repo: &repo, branch: &branch };
            record_result(&self.recorder, "host", "fetch_tree", &input, &result);
            result
        })
    }

    fn fetch_file(&self, repo: &RepoRef, path: &str) -> HostFuture<'_, String> {
        let repo = repo.clone();
        let path = path.to_string();
        Box::pin(async move {
            let result = self.inner.fetch_file(&repo, &path).await;
            let input = FileInput { repo: &repo, path: &path };
            record_result(&self.recorder, "host", "fetch_file", &input, &result);
            result
        })
    }

    fn fetch_commit_activity(&self, repo: &RepoRef) -> HostFuture<'_, serde_json::Value> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.fetch_commit_activity(&repo).await;
            record_result(&self.recorder, "host", "fetch_commit_activity", &RepoInput { repo: &repo }, &result);
            result
        })
    }

    fn fetch_contributors(&self, repo: &RepoRef) -> HostFuture<'_, serde_json::Value> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.fetch_contributors(&repo).await;
            record_result(&self.recorder, "host", "fetch_contributors", &RepoInput { repo: &repo }, &result);
            result
        })
    }
}
