//! `devlens sync` command.

use std::io::Write;

use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::project::{sync_project, RepoProject, SyncReport};
use crate::store::ProjectStore;

use super::block_on;

/// Syncs the project `id` and saves the result.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or saved, or if
/// no configured branch has a tree.
pub fn run(ctx: &ServiceContext, config: &LensConfig, id: &str, out: &mut impl Write) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &config.store_root);
    let mut project = store.load(id).map_err(|e| e.to_string())?;
    ctx.label_recording(&project.slug());

    let report = block_on(sync_project(ctx, config, &mut project))?.map_err(|e| e.to_string())?;
    store.save(&project).map_err(|e| e.to_string())?;
    print_report(out, &project, &report).map_err(|e| format!("write error: {e}"))
}

fn print_report(out: &mut impl Write, project: &RepoProject, report: &SyncReport) -> std::io::Result<()> {
    writeln!(
        out,
        "Synced {} from {}: {} nodes, {} entities",
        project.slug(),
        report.branch,
        report.nodes,
        report.entities
    )?;
    if !report.skipped_files.is_empty() {
        writeln!(out, "Skipped model files: {}", report.skipped_files.join(", "))?;
    }
    if !report.stats {
        writeln!(out, "Statistics unavailable; try again later.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use crate::commands::test_support::{context, text};
    use serde_json::json;

    #[test]
    fn imports_syncs_and_reports() {
        let mut cassette = Cassette::new("sync", "acme/widgets");
        cassette.push("id_gen", "generate_id", json!(null), json!("p-1"));
        cassette.push("clock", "now", json!(null), json!("2024-06-15T10:00:00Z"));
        cassette.push(
            "host",
            "fetch_tree",
            json!({}),
            json!({"ok": {"tree": [
                {"path": "app/models.py", "type": "blob", "size": 200},
                {"path": "README.md", "type": "blob", "size": 20}
            ]}}),
        );
        cassette.push(
            "host",
            "fetch_file",
            json!({}),
            json!({"ok": "class Post(models.Model):\n    title = models.CharField(max_length=80)\n"}),
        );
        cassette.push("clock", "now", json!(null), json!("2024-06-16T10:00:00Z"));
        cassette.push("host", "fetch_commit_activity", json!({}), json!({"err": "202 still computing"}));
        cassette.push("host", "fetch_contributors", json!({}), json!({"err": "202 still computing"}));
        let (ctx, config, root) = context("sync", &cassette);

        let mut out = Vec::new();
        super::super::import::run(&ctx, &config, "https://github.com/acme/widgets", None, true, &mut out).unwrap();

        let output = text(out);
        assert!(output.contains("Synced acme/widgets from main: 3 nodes, 1 entities"), "{output}");
        assert!(output.contains("Statistics unavailable"));

        let store = ProjectStore::new(&ctx, &root);
        let project = store.load("p-1").unwrap();
        assert_eq!(project.entities[0].name, "Post");
        assert_eq!(project.last_sync.to_rfc3339(), "2024-06-16T10:00:00+00:00");
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn unknown_project_is_an_error() {
        let (ctx, config, _root) = context("sync_missing", &Cassette::new("sync", ""));
        let err = run(&ctx, &config, "nope", &mut Vec::new()).unwrap_err();
        assert!(err.contains("failed to read project nope"));
    }
}
