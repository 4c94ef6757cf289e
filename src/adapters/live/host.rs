//! Live adapter for the `RepoHost` port using the GitHub REST API.

use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

use crate::ports::host::{HostFuture, RepoHost, RepoRef};
use crate::ports::PortError;

const GITHUB_API_URL: &str = "https://api.github.com";
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const USER_AGENT: &str = concat!("devlens/", env!("CARGO_PKG_VERSION"));

/// Repository host backed by `api.github.com`.
pub struct GitHubHost {
    client: Client,
    base_url: String,
    default_token: Option<String>,
}

impl GitHubHost {
    /// Creates a host client. `default_token` is used for repositories whose
    /// reference carries no token of its own.
    #[must_use]
    pub fn new(default_token: Option<String>) -> Self {
        Self::with_base_url(GITHUB_API_URL, default_token)
    }

    /// Creates a host client against a different API root (GitHub Enterprise).
    #[must_use]
    pub fn with_base_url(base_url: &str, default_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_token,
        }
    }

    fn request(&self, repo: &RepoRef, path: &str, accept: &str) -> RequestBuilder {
        let url = format!("{}/repos/{}/{}/{path}", self.base_url, repo.owner, repo.name);
        debug!(%url, "github request");
        let builder = self
            .client
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT);
        match repo.token.as_deref().or(self.default_token.as_deref()) {
            Some(token) => builder.header("Authorization", format!("token {token}")),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder, what: &str) -> Result<String, PortError> {
        let response = builder
            .send()
            .await
            .map_err(|e| -> PortError { format!("GitHub request for {what} failed: {e}").into() })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| -> PortError { format!("Failed to read GitHub response for {what}: {e}").into() })?;
        check_status(status, what, &body)?;
        Ok(body)
    }

    async fn get_json(&self, repo: &RepoRef, path: &str, what: &str) -> Result<serde_json::Value, PortError> {
        let body = Self::send(self.request(repo, path, JSON_MEDIA_TYPE), what).await?;
        serde_json::from_str(&body)
            .map_err(|e| format!("GitHub returned invalid JSON for {what}: {e}").into())
    }
}

/// Maps non-success responses to errors. 202 means GitHub is still computing
/// statistics and has no body yet.
fn check_status(status: StatusCode, what: &str, body: &str) -> Result<(), PortError> {
    if status == StatusCode::ACCEPTED {
        return Err(format!("GitHub is still computing {what}; try again shortly").into());
    }
    if status.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    Err(format!("GitHub error ({}) for {what}: {message}", status.as_u16()).into())
}

impl RepoHost for GitHubHost {
    fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> HostFuture<'_, serde_json::Value> {
        let repo = repo.clone();
        let branch = branch.to_string();
        Box::pin(async move {
            let path = format!("git/trees/{branch}?recursive=1");
            self.get_json(&repo, &path, &format!("tree of {}@{branch}", repo.slug())).await
        })
    }

    fn fetch_file(&self, repo: &RepoRef, path: &str) -> HostFuture<'_, String> {
        let repo = repo.clone();
        let path = path.to_string();
        Box::pin(async move {
            let builder = self.request(&repo, &format!("contents/{path}"), RAW_MEDIA_TYPE);
            Self::send(builder, &format!("{}:{path}", repo.slug())).await
        })
    }

    fn fetch_commit_activity(&self, repo: &RepoRef) -> HostFuture<'_, serde_json::Value> {
        let repo = repo.clone();
        Box::pin(async move { self.get_json(&repo, "stats/commit_activity", "commit activity").await })
    }

    fn fetch_contributors(&self, repo: &RepoRef) -> HostFuture<'_, serde_json::Value> {
        let repo = repo.clone();
        Box::pin(async move { self.get_json(&repo, "stats/contributors", "contributor statistics").await })
    }
}
