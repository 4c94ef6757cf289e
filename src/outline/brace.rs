//! Outline heuristics for brace-scoped (JavaScript/TypeScript-like) source.

use std::sync::LazyLock;

use regex::Regex;

use super::OutlineBuilder;
use crate::hierarchy::FileNode;

/// Class declaration; the name group is empty for `class {`.
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\b\s*(\w*)").unwrap()
});

/// Words that follow `class` in an anonymous class expression.
const HERITAGE_KEYWORDS: &[&str] = &["", "extends", "implements"];

/// A member signature at exactly two spaces of indentation that opens a body
/// on the same line.
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ {2}(?:(?:public|private|protected|static|async|readonly|override|abstract|get|set)\s+)*\*?(\w+)\s*(?:<[^>]*>)?\([^)]*\)\s*(?::\s*[^{]+?)?\s*\{\s*$",
    )
    .unwrap()
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(\w+)").unwrap()
});

static ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:export\s+)?(?:(?:const|let|var)\s+)?(\w+)\s*(?::[^=]*)?=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*(?::\s*[^=]+)?=>",
    )
    .unwrap()
});

/// Words that look like a method signature on an indented `word (...) {` line.
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch"];

pub(super) fn extract(source: &str, file_path: &str) -> Vec<FileNode> {
    let mut outline = OutlineBuilder::new(file_path);
    for line in source.lines() {
        if let Some(caps) = CLASS_RE.captures(line) {
            let name = &caps[1];
            if HERITAGE_KEYWORDS.contains(&name) {
                outline.close_class();
            } else {
                outline.open_class(name);
            }
            continue;
        }
        if let Some(caps) = METHOD_RE.captures(line) {
            let name = &caps[1];
            if !CONTROL_KEYWORDS.contains(&name) && outline.member(name) {
                continue;
            }
        }
        if let Some(caps) = FUNCTION_RE.captures(line) {
            outline.top_level_function(&caps[1]);
        } else if let Some(caps) = ARROW_RE.captures(line) {
            outline.top_level_function(&caps[1]);
        }
    }
    outline.finish()
}
