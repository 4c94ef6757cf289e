//! On-demand outlines for file nodes.

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{LensError, Result};
use crate::hierarchy::{FileNode, NodeKind, TreeIndex};
use crate::outline::{extract_outline, family_for_file};

use super::RepoProject;

/// Outline of the file `file_name` at `file_path`, picking the language
/// family from the name.
#[must_use]
pub fn outline_for_file(file_name: &str, file_path: &str, source: &str) -> Vec<FileNode> {
    extract_outline(source, family_for_file(file_name), file_path)
}

/// Fetches the file at `path`, outlines it and attaches the outline to
/// `index`, replacing any earlier outline of the same file.
///
/// # Errors
///
/// Returns [`LensError::UnknownNode`] or [`LensError::NotAFile`] before any
/// fetch is made, and [`LensError::Host`] if the file cannot be fetched.
pub async fn expand_node<'i>(
    ctx: &ServiceContext,
    project: &RepoProject,
    index: &'i mut TreeIndex,
    path: &str,
) -> Result<&'i [FileNode]> {
    let node = index.get(path).ok_or_else(|| LensError::UnknownNode(path.to_string()))?;
    if node.kind != NodeKind::File {
        return Err(LensError::NotAFile(path.to_string()));
    }
    let name = node.name.clone();

    let source = ctx
        .host
        .fetch_file(&project.repo_ref(), path)
        .await
        .map_err(|e| LensError::Host(e.to_string()))?;
    let outline = outline_for_file(&name, path, &source);
    debug!(%path, symbols = outline.len(), "file expanded");

    index.expand(path, outline)?;
    index.expansion(path).ok_or_else(|| LensError::UnknownNode(path.to_string()))
}
