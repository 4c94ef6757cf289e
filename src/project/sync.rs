//! Pulling a repository's tree, entities and statistics.

use tracing::{debug, info, warn};

use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::error::{LensError, Result};
use crate::hierarchy::{build, entries_from_json, flatten, NodeKind};
use crate::schema::{dialect_for_file, extract_entities};
use crate::stack::detect_stack;
use crate::stats::summarize;

use super::RepoProject;

/// What a sync produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Branch the tree was read from.
    pub branch: String,
    /// Nodes in the built hierarchy.
    pub nodes: usize,
    /// Entities extracted across all model files.
    pub entities: usize,
    /// Model files that could not be fetched.
    pub skipped_files: Vec<String>,
    /// Whether statistics were attached.
    pub stats: bool,
}

/// Refreshes `project` from the host.
///
/// Branches from the configuration are tried in order until one has a tree.
/// Model files are fetched one by one; a file that fails is skipped. A
/// statistics failure leaves `stats` empty. Neither aborts the sync.
///
/// # Errors
///
/// Returns [`LensError::Host`] if no configured branch has a tree, and the
/// hierarchy builder's errors for a malformed listing.
pub async fn sync_project(ctx: &ServiceContext, config: &LensConfig, project: &mut RepoProject) -> Result<SyncReport> {
    let repo = project.repo_ref();
    let slug = repo.slug();

    let mut last_error = String::from("no branches configured");
    let mut found = None;
    for branch in &config.branches {
        match ctx.host.fetch_tree(&repo, branch).await {
            Ok(listing) => {
                found = Some((branch.clone(), listing));
                break;
            }
            Err(e) => {
                debug!(repo = %slug, %branch, "branch unavailable: {e}");
                last_error = e.to_string();
            }
        }
    }
    let Some((branch, listing)) = found else {
        return Err(LensError::Host(format!(
            "no tree for {slug} on any of [{}]: {last_error}",
            config.branches.join(", ")
        )));
    };

    let entries = entries_from_json(&listing)?;
    let tree = build(&entries, &config.hierarchy)?;
    let nodes = flatten(&tree).len();
    info!(repo = %slug, %branch, entries = entries.len(), nodes, "tree built");

    let model_files: Vec<(String, _)> = flatten(&tree)
        .into_iter()
        .filter(|node| node.kind == NodeKind::File)
        .filter_map(|node| dialect_for_file(&node.name).map(|d| (node.path.clone(), d)))
        .collect();

    let mut entities = Vec::new();
    let mut skipped_files = Vec::new();
    for (path, dialect) in model_files {
        match ctx.host.fetch_file(&repo, &path).await {
            Ok(text) => {
                let found = extract_entities(&text, dialect);
                debug!(%path, ?dialect, entities = found.len(), "model file parsed");
                entities.extend(found);
            }
            Err(e) => {
                warn!(repo = %slug, %path, "skipping model file: {e}");
                skipped_files.push(path);
            }
        }
    }

    let now = ctx.clock.now();
    let stats = match (ctx.host.fetch_commit_activity(&repo).await, ctx.host.fetch_contributors(&repo).await) {
        (Ok(activity), Ok(contributors)) => Some(summarize(&activity, &contributors, &entries, now)),
        (Err(e), _) | (_, Err(e)) => {
            warn!(repo = %slug, "statistics unavailable: {e}");
            None
        }
    };

    let report = SyncReport {
        branch: branch.clone(),
        nodes,
        entities: entities.len(),
        skipped_files,
        stats: stats.is_some(),
    };

    project.stack = Some(detect_stack(&tree));
    project.tree = Some(tree);
    project.entities = entities;
    project.stats = stats;
    project.branch = Some(branch);
    project.last_sync = now;
    Ok(report)
}
