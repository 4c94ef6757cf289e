//! Repository hierarchy: flat tree listings turned into nested [`FileNode`] trees.

pub mod builder;
pub mod index;

use serde::{Deserialize, Serialize};

use crate::error::{LensError, Result};

pub use builder::{build, entries_from_json};
pub use index::TreeIndex;

/// Path segments dropped from every listing unless configured otherwise.
pub const DEFAULT_IGNORED_SEGMENTS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    "venv",
    "__pycache__",
    ".idea",
    ".vscode",
    ".DS_Store",
];

/// What a [`FileNode`] stands for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A directory, listed or implied by a deeper path.
    Folder,
    /// A leaf in the repository listing.
    File,
    /// A class recovered from file text by the outline extractor.
    Class,
    /// A function or method recovered from file text.
    Function,
}

/// Coarse size-derived complexity tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Small or unknown size.
    Low,
    /// Above the medium threshold.
    Medium,
    /// Above the high threshold.
    High,
}

impl Complexity {
    /// Lowercase tier name, as serialized.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One node of a repository hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileNode {
    /// Last path segment (or symbol name for synthetic nodes).
    pub name: String,
    /// Slash-joined path from the root; unique within a tree.
    pub path: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Complexity tier.
    pub complexity: Complexity,
    /// Size in bytes, for leaves whose size the listing reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Child nodes; `Some` for folders and classes, `None` for files and functions
    /// until a file is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    /// Creates an empty folder node.
    #[must_use]
    pub fn folder(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Folder,
            complexity: Complexity::Low,
            size: None,
            children: Some(Vec::new()),
        }
    }

    /// Creates a file leaf.
    #[must_use]
    pub fn file(name: &str, path: &str, size: Option<u64>, complexity: Complexity) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::File,
            complexity,
            size,
            children: None,
        }
    }

    /// Creates a synthetic class node with no members yet.
    #[must_use]
    pub fn class(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Class,
            complexity: Complexity::Medium,
            size: None,
            children: Some(Vec::new()),
        }
    }

    /// Creates a synthetic function node.
    #[must_use]
    pub fn function(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Function,
            complexity: Complexity::Low,
            size: None,
            children: None,
        }
    }

    /// Child nodes, or an empty slice for leaves.
    #[must_use]
    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Two ascending byte-size thresholds mapping leaf sizes to tiers.
///
/// A size strictly greater than `high_above` is [`Complexity::High`], strictly
/// greater than `medium_above` is [`Complexity::Medium`], anything else is
/// [`Complexity::Low`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComplexityThresholds {
    /// Sizes above this are at least medium.
    pub medium_above: u64,
    /// Sizes above this are high.
    pub high_above: u64,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self { medium_above: 10_000, high_above: 50_000 }
    }
}

impl ComplexityThresholds {
    /// Creates thresholds, rejecting a pair that is not ascending.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidInput`] when `medium_above > high_above`.
    pub fn new(medium_above: u64, high_above: u64) -> Result<Self> {
        let thresholds = Self { medium_above, high_above };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Checks that the thresholds are ascending.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidInput`] when `medium_above > high_above`.
    pub fn validate(&self) -> Result<()> {
        if self.medium_above > self.high_above {
            return Err(LensError::InvalidInput {
                component: "hierarchy",
                reason: format!(
                    "medium threshold {} exceeds high threshold {}",
                    self.medium_above, self.high_above
                ),
            });
        }
        Ok(())
    }

    /// Tier for a leaf of the given size.
    #[must_use]
    pub fn tier(&self, size: u64) -> Complexity {
        if size > self.high_above {
            Complexity::High
        } else if size > self.medium_above {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

/// Builder policy: tier thresholds and the ignored path segments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Size thresholds for leaf complexity.
    pub thresholds: ComplexityThresholds,
    /// Any entry with one of these path segments is dropped.
    pub ignored_segments: Vec<String>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            thresholds: ComplexityThresholds::default(),
            ignored_segments: DEFAULT_IGNORED_SEGMENTS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl HierarchyConfig {
    /// Returns `true` if a path segment is on the ignore list.
    #[must_use]
    pub fn is_ignored(&self, segment: &str) -> bool {
        self.ignored_segments.iter().any(|ignored| ignored == segment)
    }
}

/// Every node of `nodes` in depth-first pre-order.
#[must_use]
pub fn flatten(nodes: &[FileNode]) -> Vec<&FileNode> {
    let mut out = Vec::new();
    let mut stack: Vec<&FileNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children().iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strictly_greater_than() {
        let t = ComplexityThresholds::default();
        assert_eq!(t.tier(0), Complexity::Low);
        assert_eq!(t.tier(10_000), Complexity::Low);
        assert_eq!(t.tier(10_001), Complexity::Medium);
        assert_eq!(t.tier(50_000), Complexity::Medium);
        assert_eq!(t.tier(50_001), Complexity::High);
    }

    #[test]
    fn tiers_are_monotonic_in_size() {
        let t = ComplexityThresholds::new(30_000, 100_000).unwrap();
        let sizes = [0, 5, 29_999, 30_000, 30_001, 99_999, 100_000, 100_001, u64::MAX];
        for pair in sizes.windows(2) {
            assert!(t.tier(pair[0]) <= t.tier(pair[1]), "{pair:?}");
        }
        assert_eq!(t.tier(1_000), t.tier(20_000));
        assert!(t.tier(30_001) > t.tier(30_000));
    }

    #[test]
    fn descending_thresholds_rejected() {
        let err = ComplexityThresholds::new(50, 10).unwrap_err();
        assert!(matches!(err, LensError::InvalidInput { component: "hierarchy", .. }));
    }

    #[test]
    fn flatten_is_preorder() {
        let mut src = FileNode::folder("src", "src");
        let mut nested = FileNode::folder("util", "src/util");
        nested.children = Some(vec![FileNode::file("a.rs", "src/util/a.rs", None, Complexity::Low)]);
        src.children = Some(vec![nested, FileNode::file("b.rs", "src/b.rs", None, Complexity::Low)]);
        let tree = vec![src, FileNode::file("README.md", "README.md", None, Complexity::Low)];

        let paths: Vec<&str> = flatten(&tree).iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "src/util", "src/util/a.rs", "src/b.rs", "README.md"]);
    }

    #[test]
    fn node_serializes_with_lowercase_tags() {
        let node = FileNode::file("a.ts", "src/a.ts", Some(12), Complexity::Low);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "file");
        assert_eq!(json["complexity"], "low");
        assert!(json.get("children").is_none());
    }
}
