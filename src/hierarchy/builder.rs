//! Tree construction from a flat recursive listing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{FileNode, HierarchyConfig, NodeKind};
use crate::error::{LensError, Result};

/// Kind of a listing entry, as reported by the git trees API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    /// A submodule pointer; treated as a file leaf.
    Commit,
}

/// One entry of a flat repository listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeEntry {
    /// Slash-separated path from the repository root.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl TreeEntry {
    /// Shorthand for a blob entry.
    #[must_use]
    pub fn blob(path: &str, size: Option<u64>) -> Self {
        Self { path: path.to_string(), kind: EntryKind::Blob, size }
    }

    /// Shorthand for a tree entry.
    #[must_use]
    pub fn tree(path: &str) -> Self {
        Self { path: path.to_string(), kind: EntryKind::Tree, size: None }
    }
}

/// Reads listing entries out of a trees API response.
///
/// Accepts either the full response object (entries under `"tree"`) or a
/// bare array of entries.
///
/// # Errors
///
/// Returns [`LensError::MalformedEntry`] for the first entry without a
/// usable `path` or `type`, and [`LensError::InvalidInput`] when the value
/// holds no entry array at all.
pub fn entries_from_json(value: &serde_json::Value) -> Result<Vec<TreeEntry>> {
    let items = value
        .as_array()
        .or_else(|| value.get("tree").and_then(serde_json::Value::as_array))
        .ok_or_else(|| LensError::InvalidInput {
            component: "hierarchy",
            reason: "listing has no entry array".to_string(),
        })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = item
                .get("path")
                .and_then(serde_json::Value::as_str)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| LensError::MalformedEntry {
                    index,
                    reason: "missing path".to_string(),
                })?;
            let kind = match item.get("type").and_then(serde_json::Value::as_str) {
                Some("blob") => EntryKind::Blob,
                Some("tree") => EntryKind::Tree,
                Some("commit") => EntryKind::Commit,
                Some(other) => {
                    return Err(LensError::MalformedEntry {
                        index,
                        reason: format!("unknown entry type {other:?}"),
                    })
                }
                None => {
                    return Err(LensError::MalformedEntry {
                        index,
                        reason: "missing type".to_string(),
                    })
                }
            };
            let size = item.get("size").and_then(serde_json::Value::as_u64);
            Ok(TreeEntry { path: path.to_string(), kind, size })
        })
        .collect()
}

/// Node under construction: the node itself plus child slot indices.
struct Slot {
    node: FileNode,
    children: Vec<usize>,
}

/// Builds the nested hierarchy for a flat listing.
///
/// Entries are processed in order. Each cumulative path is registered once;
/// later entries implying the same path are no-ops, so the first writer
/// decides a node's kind. Children keep discovery order.
///
/// # Errors
///
/// Returns [`LensError::MalformedEntry`] when an entry's path has no
/// segments. No partial tree is returned.
pub fn build(entries: &[TreeEntry], config: &HierarchyConfig) -> Result<Vec<FileNode>> {
    let mut slots: Vec<Slot> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(LensError::MalformedEntry { index, reason: "empty path".to_string() });
        }
        if segments.iter().any(|segment| config.is_ignored(segment)) {
            trace!(path = %entry.path, "skipping ignored path");
            continue;
        }

        let mut parent: Option<usize> = None;
        let mut current = String::new();
        for (depth, segment) in segments.iter().enumerate() {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);

            if let Some(&existing) = by_path.get(&current) {
                parent = Some(existing);
                continue;
            }

            let is_last = depth + 1 == segments.len();
            let node = if is_last { leaf(segment, &current, entry, config) } else { FileNode::folder(segment, &current) };

            let slot = slots.len();
            match parent {
                None => roots.push(slot),
                Some(p) if slots[p].node.kind == NodeKind::Folder => slots[p].children.push(slot),
                Some(_) => {
                    debug!(path = %current, "dropping entry nested under a file");
                    break;
                }
            }
            slots.push(Slot { node, children: Vec::new() });
            by_path.insert(current.clone(), slot);
            parent = Some(slot);
        }
    }

    debug!(entries = entries.len(), nodes = slots.len(), "built hierarchy");
    Ok(roots.iter().map(|&root| assemble(&slots, root)).collect())
}

fn leaf(name: &str, path: &str, entry: &TreeEntry, config: &HierarchyConfig) -> FileNode {
    match entry.kind {
        EntryKind::Tree => FileNode::folder(name, path),
        EntryKind::Blob | EntryKind::Commit => {
            let complexity = entry
                .size
                .map_or(super::Complexity::Low, |size| config.thresholds.tier(size));
            FileNode::file(name, path, entry.size, complexity)
        }
    }
}

fn assemble(slots: &[Slot], slot: usize) -> FileNode {
    let mut node = slots[slot].node.clone();
    if node.kind == NodeKind::Folder {
        node.children =
            Some(slots[slot].children.iter().map(|&child| assemble(slots, child)).collect());
    }
    node
}
