//! Repository host port: raw tree listings, file text and statistics.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;

/// Boxed future returned by [`RepoHost`] methods.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// Identifies a hosted repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Access token for private repositories; never recorded.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl RepoRef {
    /// Creates a reference without a token.
    #[must_use]
    pub fn new(owner: &str, name: &str) -> Self {
        Self { owner: owner.to_string(), name: name.to_string(), token: None }
    }

    /// `owner/name`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Fetches repository data. Results are returned raw; interpretation is the
/// caller's job.
pub trait RepoHost: Send + Sync {
    /// Recursive tree listing of `branch` (the trees API response object).
    ///
    /// # Errors
    ///
    /// Returns an error if the branch does not exist or the request fails.
    fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> HostFuture<'_, serde_json::Value>;

    /// UTF-8 text of the file at `path` on the default branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the request fails.
    fn fetch_file(&self, repo: &RepoRef, path: &str) -> HostFuture<'_, String>;

    /// Weekly commit activity for the last year.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics are unavailable or the request fails.
    fn fetch_commit_activity(&self, repo: &RepoRef) -> HostFuture<'_, serde_json::Value>;

    /// Per-contributor weekly additions, deletions and commits.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics are unavailable or the request fails.
    fn fetch_contributors(&self, repo: &RepoRef) -> HostFuture<'_, serde_json::Value>;
}
