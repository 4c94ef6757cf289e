//! `devlens show` and `devlens list` commands.

use std::io::Write;

use crate::cli::Section;
use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::hierarchy::flatten;
use crate::project::RepoProject;
use crate::store::ProjectStore;

use super::write_json;

/// Lists stored projects, one per line.
///
/// # Errors
///
/// Returns an error string if the store cannot be read.
pub fn list(ctx: &ServiceContext, config: &LensConfig, out: &mut impl Write) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &config.store_root);
    let ids = store.list().map_err(|e| e.to_string())?;
    let write_err = |e: std::io::Error| format!("write error: {e}");

    if ids.is_empty() {
        writeln!(out, "No projects imported.").map_err(write_err)?;
        return writeln!(out, "Use `devlens import <URL>` to add one.").map_err(write_err);
    }
    for id in &ids {
        let project = store.load(id).map_err(|e| e.to_string())?;
        let synced = if project.tree.is_some() { "synced" } else { "not synced" };
        writeln!(
            out,
            "{id}  {}  {synced}  {}",
            project.slug(),
            project.last_sync.format("%Y-%m-%d %H:%M")
        )
        .map_err(write_err)?;
    }
    Ok(())
}

/// Prints the project `id`: a summary, or one section as JSON.
///
/// # Errors
///
/// Returns an error string if the project cannot be loaded or the section
/// has not been computed yet.
pub fn run(
    ctx: &ServiceContext,
    config: &LensConfig,
    id: &str,
    section: Option<Section>,
    out: &mut impl Write,
) -> Result<(), String> {
    let project = ProjectStore::new(ctx, &config.store_root).load(id).map_err(|e| e.to_string())?;
    let Some(section) = section else {
        return print_summary(out, &project).map_err(|e| format!("write error: {e}"));
    };

    let missing = |what: &str| format!("project {id} has no {what} yet");
    match section {
        Section::Tree => write_json(out, project.tree.as_ref().ok_or_else(|| missing("tree"))?),
        Section::Entities => write_json(out, &project.entities),
        Section::Stats => write_json(out, project.stats.as_ref().ok_or_else(|| missing("statistics"))?),
        Section::Stack => write_json(out, project.stack.as_ref().ok_or_else(|| missing("stack"))?),
        Section::Analysis => write_json(out, project.analysis.as_ref().ok_or_else(|| missing("analysis"))?),
    }
}

fn print_summary(out: &mut impl Write, project: &RepoProject) -> std::io::Result<()> {
    writeln!(out, "Project: {} ({})", project.slug(), project.id)?;
    writeln!(out, "URL: {}", project.url)?;
    writeln!(out, "Last sync: {}", project.last_sync.to_rfc3339())?;

    let Some(tree) = &project.tree else {
        return writeln!(out, "\nNot synced yet.");
    };
    if let Some(branch) = &project.branch {
        writeln!(out, "Branch: {branch}")?;
    }
    writeln!(out, "Nodes: {}", flatten(tree).len())?;

    if !project.entities.is_empty() {
        writeln!(out, "\nEntities:")?;
        for entity in &project.entities {
            writeln!(
                out,
                "  {} ({} fields, {} relations)",
                entity.name,
                entity.fields.len(),
                entity.relations.len()
            )?;
        }
    }

    if let Some(stack) = project.stack.as_ref().filter(|s| !s.is_empty()) {
        writeln!(out, "\nStack:")?;
        for (layer, items) in [
            ("frontend", &stack.frontend),
            ("backend", &stack.backend),
            ("devops", &stack.devops),
        ] {
            if !items.is_empty() {
                writeln!(out, "  {layer}: {}", items.join(", "))?;
            }
        }
    }

    if let Some(stats) = &project.stats {
        let total = &stats.periods.total;
        writeln!(
            out,
            "\nActivity: {} commits, +{} -{} lines, {} contributors",
            total.commits,
            total.additions,
            total.deletions,
            stats.contributors.len()
        )?;
        for contributor in stats.contributors.iter().take(5) {
            writeln!(out, "  {} ({} commits)", contributor.author, contributor.commits)?;
        }
    }

    if project.analysis.is_some() {
        writeln!(out, "\nAnalysis available: `devlens show {} --section analysis`", project.id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use crate::commands::remove;
    use crate::commands::test_support::{context, text};
    use crate::hierarchy::{Complexity, FileNode};
    use crate::schema::Entity;
    use chrono::{TimeZone, Utc};

    fn project(id: &str, synced: bool) -> RepoProject {
        let entity = Entity { name: "User".into(), ..Entity::default() };
        RepoProject {
            id: id.into(),
            name: "widgets".into(),
            owner: "acme".into(),
            url: "https://github.com/acme/widgets".into(),
            token: None,
            last_sync: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
            branch: synced.then(|| "main".to_string()),
            tree: synced.then(|| vec![FileNode::file("schema.prisma", "schema.prisma", Some(10), Complexity::Low)]),
            stats: None,
            entities: if synced { vec![entity] } else { Vec::new() },
            stack: None,
            analysis: None,
        }
    }

    #[test]
    fn list_then_remove() {
        let (ctx, config, root) = context("show_list", &Cassette::new("show", ""));
        let store = ProjectStore::new(&ctx, &root);

        let mut out = Vec::new();
        list(&ctx, &config, &mut out).unwrap();
        assert!(text(out).starts_with("No projects imported."));

        store.save(&project("a", true)).unwrap();
        store.save(&project("b", false)).unwrap();
        let mut out = Vec::new();
        list(&ctx, &config, &mut out).unwrap();
        assert_eq!(
            text(out),
            "a  acme/widgets  synced  2024-06-15 10:00\nb  acme/widgets  not synced  2024-06-15 10:00\n"
        );

        remove::run(&ctx, &config, "a", &mut Vec::new()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["b"]);
        assert!(remove::run(&ctx, &config, "a", &mut Vec::new()).is_err());
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn summary_and_sections() {
        let (ctx, config, root) = context("show_summary", &Cassette::new("show", ""));
        let store = ProjectStore::new(&ctx, &root);
        store.save(&project("a", true)).unwrap();
        store.save(&project("b", false)).unwrap();

        let mut out = Vec::new();
        run(&ctx, &config, "a", None, &mut out).unwrap();
        let summary = text(out);
        assert!(summary.contains("Project: acme/widgets (a)"));
        assert!(summary.contains("Nodes: 1"));
        assert!(summary.contains("  User (0 fields, 0 relations)"));

        let mut out = Vec::new();
        run(&ctx, &config, "a", Some(Section::Entities), &mut out).unwrap();
        let entities: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(entities[0]["name"], "User");

        let mut out = Vec::new();
        run(&ctx, &config, "b", None, &mut out).unwrap();
        assert!(text(out).contains("Not synced yet."));

        let err = run(&ctx, &config, "b", Some(Section::Tree), &mut Vec::new()).unwrap_err();
        assert_eq!(err, "project b has no tree yet");
        let _ = std::fs::remove_dir_all(root);
    }
}
