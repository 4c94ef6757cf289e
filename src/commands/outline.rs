//! `devlens outline` and `devlens outline-file` commands.

use std::io::Write;
use std::path::Path;

use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::outline::{extract_outline_from_bytes, family_for_file};
use crate::project::expand_node;
use crate::store::ProjectStore;

use super::{block_on, synced_index, write_json};

/// Outlines the file at `path` of project `id` and prints it as JSON.
/// With `save`, the tree with the outline attached replaces the stored tree.
///
/// # Errors
///
/// Returns an error string if the project is not synced, the path is not a
/// file of the tree, or the file cannot be fetched.
pub fn run(
    ctx: &ServiceContext,
    config: &LensConfig,
    id: &str,
    path: &str,
    save: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &config.store_root);
    let mut project = store.load(id).map_err(|e| e.to_string())?;
    ctx.label_recording(&project.slug());
    let mut index = synced_index(&project)?;

    let outline = block_on(expand_node(ctx, &project, &mut index, path))?.map_err(|e| e.to_string())?;
    write_json(out, outline)?;

    if save {
        project.tree = Some(index.materialize());
        store.save(&project).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Outlines a local source file and prints it as JSON.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or is not UTF-8.
pub fn run_file(file: &Path, out: &mut impl Write) -> Result<(), String> {
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let bytes = std::fs::read(file).map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let outline = extract_outline_from_bytes(&bytes, family_for_file(name), &file.display().to_string())
        .map_err(|e| e.to_string())?;
    write_json(out, &outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use crate::commands::test_support::context;
    use crate::hierarchy::{Complexity, FileNode};
    use crate::project::RepoProject;
    use chrono::Utc;
    use serde_json::json;

    fn synced_project() -> RepoProject {
        let mut src = FileNode::folder("src", "src");
        src.children = Some(vec![FileNode::file("app.py", "src/app.py", Some(40), Complexity::Low)]);
        RepoProject {
            id: "p-1".into(),
            name: "widgets".into(),
            owner: "acme".into(),
            url: "https://github.com/acme/widgets".into(),
            token: None,
            last_sync: Utc::now(),
            branch: Some("main".into()),
            tree: Some(vec![src]),
            stats: None,
            entities: Vec::new(),
            stack: None,
            analysis: None,
        }
    }

    #[test]
    fn outline_prints_and_saves() {
        let mut cassette = Cassette::new("outline", "acme/widgets");
        cassette.push("host", "fetch_file", json!({}), json!({"ok": "def main():\n    pass\n"}));
        let (ctx, config, root) = context("outline", &cassette);
        let store = ProjectStore::new(&ctx, &root);
        store.save(&synced_project()).unwrap();

        let mut out = Vec::new();
        run(&ctx, &config, "p-1", "src/app.py", true, &mut out).unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed[0]["path"], "src/app.py/main");
        assert_eq!(printed[0]["kind"], "function");

        let saved = store.load("p-1").unwrap();
        let tree = saved.tree.unwrap();
        let app = &tree[0].children()[0];
        assert_eq!(app.children()[0].name, "main");
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn folder_path_is_rejected() {
        let (ctx, config, root) = context("outline_folder", &Cassette::new("outline", ""));
        ProjectStore::new(&ctx, &root).save(&synced_project()).unwrap();
        let err = run(&ctx, &config, "p-1", "src", false, &mut Vec::new()).unwrap_err();
        assert_eq!(err, "node at path src is not a file");
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn outline_file_uses_extension() {
        let dir = std::env::temp_dir().join("devlens_outline_file_cmd");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("widget.ts");
        std::fs::write(&path, "export class Widget {\n  render() {\n  }\n}\n").unwrap();

        let mut out = Vec::new();
        run_file(&path, &mut out).unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed[0]["name"], "Widget");
        assert_eq!(printed[0]["kind"], "class");
        assert_eq!(printed[0]["children"][0]["name"], "render");
        let _ = std::fs::remove_dir_all(dir);
    }
}
