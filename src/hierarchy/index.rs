//! Path-keyed index over a built hierarchy with lazily attached outlines.

use std::collections::HashMap;

use super::{FileNode, NodeKind};
use crate::error::{LensError, Result};

/// A built tree plus the outlines attached to its file nodes.
///
/// The tree itself is never mutated after construction. Outlines live in a
/// separate map keyed by file path, so expanding one file cannot touch any
/// other, and expanding the same file again replaces its outline.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    roots: Vec<FileNode>,
    /// Child-position route from the root list to each node.
    routes: HashMap<String, Vec<usize>>,
    expansions: HashMap<String, Vec<FileNode>>,
}

impl TreeIndex {
    /// Indexes every node of `roots` by path.
    #[must_use]
    pub fn new(roots: Vec<FileNode>) -> Self {
        let mut routes = HashMap::new();
        // Pre-order walk, so the first node to claim a path keeps it.
        let mut stack: Vec<(Vec<usize>, &FileNode)> =
            roots.iter().enumerate().rev().map(|(i, node)| (vec![i], node)).collect();
        while let Some((route, node)) = stack.pop() {
            for (i, child) in node.children().iter().enumerate().rev() {
                let mut child_route = route.clone();
                child_route.push(i);
                stack.push((child_route, child));
            }
            routes.entry(node.path.clone()).or_insert(route);
        }
        Self { roots, routes, expansions: HashMap::new() }
    }

    /// The tree as built, without attached outlines.
    #[must_use]
    pub fn roots(&self) -> &[FileNode] {
        &self.roots
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Looks up a node by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileNode> {
        let route = self.routes.get(path)?;
        let (first, rest) = route.split_first()?;
        let mut node = self.roots.get(*first)?;
        for &i in rest {
            node = node.children().get(i)?;
        }
        Some(node)
    }

    /// Attaches `outline` as the children of the file at `path`, replacing any
    /// earlier outline for that file.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::UnknownNode`] if no node has that path and
    /// [`LensError::NotAFile`] if the node is not a file.
    pub fn expand(&mut self, path: &str, outline: Vec<FileNode>) -> Result<()> {
        let node = self.get(path).ok_or_else(|| LensError::UnknownNode(path.to_string()))?;
        if node.kind != NodeKind::File {
            return Err(LensError::NotAFile(path.to_string()));
        }
        self.expansions.insert(path.to_string(), outline);
        Ok(())
    }

    /// The outline attached to a file, if it was expanded.
    #[must_use]
    pub fn expansion(&self, path: &str) -> Option<&[FileNode]> {
        self.expansions.get(path).map(Vec::as_slice)
    }

    /// Copy of the tree with every attached outline in place.
    #[must_use]
    pub fn materialize(&self) -> Vec<FileNode> {
        self.roots.iter().map(|root| self.materialize_node(root)).collect()
    }

    fn materialize_node(&self, node: &FileNode) -> FileNode {
        let mut out = node.clone();
        if let Some(outline) = self.expansions.get(&node.path) {
            out.children = Some(outline.clone());
        } else if let Some(children) = &node.children {
            out.children = Some(children.iter().map(|c| self.materialize_node(c)).collect());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::builder::{build, TreeEntry};
    use crate::hierarchy::HierarchyConfig;

    fn index() -> TreeIndex {
        let entries = vec![
            TreeEntry::blob("src/app.py", Some(100)),
            TreeEntry::blob("src/web/index.ts", Some(100)),
            TreeEntry::blob("README.md", Some(10)),
        ];
        TreeIndex::new(build(&entries, &HierarchyConfig::default()).unwrap())
    }

    #[test]
    fn looks_up_nested_nodes() {
        let idx = index();
        assert_eq!(idx.len(), 5);
        assert_eq!(idx.get("src/web/index.ts").unwrap().name, "index.ts");
        assert_eq!(idx.get("src/web").unwrap().kind, NodeKind::Folder);
        assert!(idx.get("src/missing").is_none());
    }

    #[test]
    fn expansion_replaces_instead_of_duplicating() {
        let mut idx = index();
        idx.expand("src/app.py", vec![FileNode::function("a", "src/app.py/a")]).unwrap();
        idx.expand(
            "src/app.py",
            vec![FileNode::function("b", "src/app.py/b"), FileNode::function("c", "src/app.py/c")],
        )
        .unwrap();

        let tree = idx.materialize();
        let app = &tree[0].children()[0];
        let names: Vec<&str> = app.children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert!(idx.roots()[0].children()[0].children.is_none());
    }

    #[test]
    fn expanding_folder_is_rejected() {
        let mut idx = index();
        let err = idx.expand("src", Vec::new()).unwrap_err();
        assert!(matches!(err, LensError::NotAFile(_)));
        let err = idx.expand("nope.py", Vec::new()).unwrap_err();
        assert!(matches!(err, LensError::UnknownNode(_)));
    }

    #[test]
    fn colliding_paths_keep_the_first_node() {
        let mut file = FileNode::file("a.ts", "a.ts", Some(10), crate::hierarchy::Complexity::Low);
        file.children = Some(vec![FileNode::class("Run", "a.ts/Run"), FileNode::function("Run", "a.ts/Run")]);
        let idx = TreeIndex::new(vec![file, FileNode::folder("a.ts/Run", "a.ts/Run")]);
        assert_eq!(idx.get("a.ts/Run").unwrap().kind, NodeKind::Class);
    }

    #[test]
    fn unexpanded_tree_materializes_unchanged() {
        let idx = index();
        assert_eq!(idx.materialize(), idx.roots());
    }
}
