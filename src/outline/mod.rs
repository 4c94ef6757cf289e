//! Coarse class/function outlines recovered from source text.
//!
//! This is a line-pattern heuristic, not a parser: there is no tokenizer, no
//! scope tracking beyond "the most recently opened class", and no support for
//! multi-line signatures or nested classes. It trades accuracy for working
//! across many languages without per-language grammars.

pub mod brace;
pub mod indent;

use serde::{Deserialize, Serialize};

use crate::error::{LensError, Result};
use crate::hierarchy::FileNode;

/// Source language bucket used to pick the outline heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageFamily {
    /// Indentation-scoped languages (Python).
    IndentBased,
    /// Brace-scoped languages (JavaScript, TypeScript and similar).
    BraceBased,
}

/// Picks the language family from a file name's extension.
#[must_use]
pub fn family_for_file(file_name: &str) -> LanguageFamily {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("py" | "pyw" | "pyi") => LanguageFamily::IndentBased,
        _ => LanguageFamily::BraceBased,
    }
}

/// Extracts top-level classes (with members) and functions from `source`.
///
/// `file_path` prefixes every synthesized path: top-level symbols become
/// `<file_path>/<name>` and members `<file_path>/<Class>/<name>`. Duplicate
/// names produce duplicate paths.
#[must_use]
pub fn extract_outline(source: &str, family: LanguageFamily, file_path: &str) -> Vec<FileNode> {
    match family {
        LanguageFamily::IndentBased => indent::extract(source, file_path),
        LanguageFamily::BraceBased => brace::extract(source, file_path),
    }
}

/// Like [`extract_outline`] for raw file bytes.
///
/// # Errors
///
/// Returns [`LensError::InvalidInput`] when `bytes` is not UTF-8.
pub fn extract_outline_from_bytes(
    bytes: &[u8],
    family: LanguageFamily,
    file_path: &str,
) -> Result<Vec<FileNode>> {
    let source = std::str::from_utf8(bytes).map_err(|e| LensError::not_utf8("outline", &e))?;
    Ok(extract_outline(source, family, file_path))
}

/// Collects outline nodes, attaching members to the most recently opened class.
struct OutlineBuilder<'a> {
    file_path: &'a str,
    nodes: Vec<FileNode>,
    current_class: Option<usize>,
}

impl<'a> OutlineBuilder<'a> {
    fn new(file_path: &'a str) -> Self {
        Self { file_path, nodes: Vec::new(), current_class: None }
    }

    fn open_class(&mut self, name: &str) {
        let path = format!("{}/{name}", self.file_path);
        self.current_class = Some(self.nodes.len());
        self.nodes.push(FileNode::class(name, &path));
    }

    fn close_class(&mut self) {
        self.current_class = None;
    }

    fn top_level_function(&mut self, name: &str) {
        let path = format!("{}/{name}", self.file_path);
        self.nodes.push(FileNode::function(name, &path));
    }

    /// Adds a member to the open class; returns `false` when no class is open.
    fn member(&mut self, name: &str) -> bool {
        let Some(class) = self.current_class.and_then(|i| self.nodes.get_mut(i)) else {
            return false;
        };
        let path = format!("{}/{name}", class.path);
        class.children.get_or_insert_with(Vec::new).push(FileNode::function(name, &path));
        true
    }

    fn finish(self) -> Vec<FileNode> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::NodeKind;

    #[test]
    fn family_from_extension() {
        assert_eq!(family_for_file("app.py"), LanguageFamily::IndentBased);
        assert_eq!(family_for_file("SETUP.PY"), LanguageFamily::IndentBased);
        assert_eq!(family_for_file("index.tsx"), LanguageFamily::BraceBased);
        assert_eq!(family_for_file("Makefile"), LanguageFamily::BraceBased);
    }

    #[test]
    fn nothing_matches_in_noise() {
        for family in [LanguageFamily::IndentBased, LanguageFamily::BraceBased] {
            assert!(extract_outline("", family, "f").is_empty());
            assert!(extract_outline("\u{0}\u{7f}ELF\u{2}\u{1}}}{{", family, "f").is_empty());
        }
    }

    #[test]
    fn non_utf8_bytes_rejected() {
        let err =
            extract_outline_from_bytes(&[0xff, 0x00], LanguageFamily::IndentBased, "x.py").unwrap_err();
        assert!(matches!(err, LensError::InvalidInput { component: "outline", .. }));
    }

    #[test]
    fn members_nest_under_class_paths() {
        let mut builder = OutlineBuilder::new("src/app.py");
        assert!(!builder.member("orphan"));
        builder.open_class("Service");
        assert!(builder.member("run"));
        builder.top_level_function("main");
        let nodes = builder.finish();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind, NodeKind::Class);
        assert_eq!(nodes[0].path, "src/app.py/Service");
        assert_eq!(nodes[0].children()[0].path, "src/app.py/Service/run");
        assert_eq!(nodes[1].path, "src/app.py/main");
    }
}
