//! Imported repositories and the pipeline that fills them in.
//!
//! A [`RepoProject`] starts as a bare reference created by [`import_project`].
//! [`sync_project`] pulls the tree through the host port, builds the
//! hierarchy, extracts entities from recognized model files, and attaches
//! statistics and a stack guess. File outlines are computed on demand by
//! [`expand_node`] and never stored in the project itself.

pub mod expand;
pub mod sync;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisResult;
use crate::context::ServiceContext;
use crate::error::{LensError, Result};
use crate::hierarchy::FileNode;
use crate::ports::RepoRef;
use crate::schema::Entity;
use crate::stack::StackSummary;
use crate::stats::GitStats;
use crate::store::ProjectStore;

pub use expand::{expand_node, outline_for_file};
pub use sync::{sync_project, SyncReport};

/// `github.com/<owner>/<repo>` in https, scheme-less or scp-style form.
static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:https?://)?(?:www\.)?github\.com/|git@github\.com:)([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:[/?#].*)?$",
    )
    .unwrap()
});

/// An imported repository and everything derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepoProject {
    /// Store key.
    pub id: String,
    /// Repository name.
    pub name: String,
    /// Owning account or organization.
    pub owner: String,
    /// URL the project was imported from.
    pub url: String,
    /// Per-project access token, overriding the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Time of import or of the last successful sync.
    pub last_sync: DateTime<Utc>,
    /// Branch the last sync read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Repository hierarchy from the last sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Vec<FileNode>>,
    /// Repository statistics, if the host provided them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<GitStats>,
    /// Entities extracted from model files.
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Path-based stack guess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackSummary>,
    /// Latest LLM audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

impl RepoProject {
    /// `owner/name`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Host reference carrying this project's token.
    #[must_use]
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef { owner: self.owner.clone(), name: self.name.clone(), token: self.token.clone() }
    }
}

/// Splits a GitHub URL into `(owner, repo)`.
///
/// Accepts `https://github.com/o/r`, a trailing `.git` or `/`, deeper paths
/// such as `/tree/main/src`, scheme-less `github.com/o/r` and `git@github.com:o/r.git`.
///
/// # Errors
///
/// Returns [`LensError::InvalidRepoUrl`] for anything else.
pub fn parse_repo_url(url: &str) -> Result<(String, String)> {
    let url = url.trim();
    let caps = REPO_URL_RE.captures(url).ok_or_else(|| LensError::InvalidRepoUrl(url.to_string()))?;
    let (owner, name) = (&caps[1], &caps[2]);
    if owner.starts_with('.') || name.starts_with('.') {
        return Err(LensError::InvalidRepoUrl(url.to_string()));
    }
    Ok((owner.to_string(), name.to_string()))
}

/// Registers a repository and persists it without syncing.
///
/// # Errors
///
/// Returns [`LensError::InvalidRepoUrl`] for a bad URL and
/// [`LensError::Store`] if the project cannot be written.
pub fn import_project(
    ctx: &ServiceContext,
    store: &ProjectStore<'_>,
    url: &str,
    token: Option<String>,
) -> Result<RepoProject> {
    let (owner, name) = parse_repo_url(url)?;
    let project = RepoProject {
        id: ctx.id_gen.generate_id(),
        name,
        owner,
        url: url.trim().to_string(),
        token,
        last_sync: ctx.clock.now(),
        branch: None,
        tree: None,
        stats: None,
        entities: Vec::new(),
        stack: None,
        analysis: None,
    };
    store.save(&project)?;
    info!(id = %project.id, repo = %project.slug(), "project imported");
    Ok(project)
}
