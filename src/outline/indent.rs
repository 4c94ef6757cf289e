//! Outline heuristics for indentation-scoped (Python-like) source.

use std::sync::LazyLock;

use regex::Regex;

use super::OutlineBuilder;
use crate::hierarchy::FileNode;

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^class\s+(\w+)").unwrap());

/// Exactly one indentation level: four spaces or a tab, then `def`.
static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?: {4}|\t)(?:async\s+)?def\s+(\w+)").unwrap());

static FUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:async\s+)?def\s+(\w+)").unwrap());

pub(super) fn extract(source: &str, file_path: &str) -> Vec<FileNode> {
    let mut outline = OutlineBuilder::new(file_path);
    for line in source.lines() {
        if let Some(caps) = CLASS_RE.captures(line) {
            outline.open_class(&caps[1]);
        } else if let Some(caps) = METHOD_RE.captures(line) {
            outline.member(&caps[1]);
        } else if let Some(caps) = FUNCTION_RE.captures(line) {
            outline.top_level_function(&caps[1]);
        }
    }
    outline.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::NodeKind;

    #[test]
    fn golden_class_and_function() {
        let nodes = extract("class Foo:\n    def bar(self):\n        pass\ndef baz():\n    pass", "m.py");
        assert_eq!(nodes.len(), 2);

        let foo = &nodes[0];
        assert_eq!(foo.kind, NodeKind::Class);
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.children().len(), 1);
        assert_eq!(foo.children()[0].kind, NodeKind::Function);
        assert_eq!(foo.children()[0].name, "bar");
        assert_eq!(foo.children()[0].path, "m.py/Foo/bar");

        assert_eq!(nodes[1].kind, NodeKind::Function);
        assert_eq!(nodes[1].name, "baz");
        assert_eq!(nodes[1].path, "m.py/baz");
    }

    #[test]
    fn only_first_indent_level_counts() {
        let source = "class Repo:\n    async def load(self):\n        def inner():\n            pass\n\tdef tabbed(self): ...\n";
        let nodes = extract(source, "repo.py");
        let members: Vec<&str> = nodes[0].children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(members, vec!["load", "tabbed"]);
    }

    #[test]
    fn indented_def_without_class_is_ignored() {
        let nodes = extract("if DEBUG:\n    def trace():\n        pass\n", "x.py");
        assert!(nodes.is_empty());
    }

    #[test]
    fn class_context_survives_dedent() {
        let source = "class A:\n    def one(self): pass\n\ndef helper():\n    def two(): pass\n";
        let nodes = extract(source, "a.py");
        let members: Vec<&str> = nodes[0].children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(members, vec!["one", "two"]);
        assert_eq!(nodes[1].name, "helper");
    }

    #[test]
    fn duplicate_names_are_kept() {
        let nodes = extract("def f():\n    pass\ndef f():\n    pass\n", "dup.py");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].path, nodes[1].path);
    }
}
