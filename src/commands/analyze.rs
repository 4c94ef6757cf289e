//! `devlens analyze` and `devlens ask` commands.

use std::io::Write;

use tracing::warn;

use crate::analysis::{analyze, ask_about_node, node_insight};
use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::error::LensError;
use crate::hierarchy::NodeKind;
use crate::store::ProjectStore;

use super::{block_on, synced_index, write_json};

/// Runs the LLM audit for project `id`, stores it and prints it as JSON.
///
/// # Errors
///
/// Returns an error string if the project is not synced or the LLM call fails.
pub fn run(ctx: &ServiceContext, config: &LensConfig, id: &str, out: &mut impl Write) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &config.store_root);
    let mut project = store.load(id).map_err(|e| e.to_string())?;
    ctx.label_recording(&project.slug());
    let index = synced_index(&project)?;

    let result = block_on(analyze(ctx, &config.llm, &project.slug(), index.roots()))?.map_err(|e| e.to_string())?;
    write_json(out, &result)?;
    project.analysis = Some(result);
    store.save(&project).map_err(|e| e.to_string())
}

/// Asks about the node at `path`. Without a question, asks for insights.
/// File nodes carry an excerpt of their content when it can be fetched.
///
/// # Errors
///
/// Returns an error string if the project is not synced, the path is
/// unknown, or the LLM call fails.
pub fn ask(
    ctx: &ServiceContext,
    config: &LensConfig,
    id: &str,
    path: &str,
    question: Option<&str>,
    out: &mut impl Write,
) -> Result<(), String> {
    let project = ProjectStore::new(ctx, &config.store_root).load(id).map_err(|e| e.to_string())?;
    ctx.label_recording(&project.slug());
    let index = synced_index(&project)?;
    let node = index.get(path).ok_or_else(|| LensError::UnknownNode(path.to_string()).to_string())?;
    let repo_name = project.slug();

    let answer = block_on(async {
        let Some(question) = question else {
            return node_insight(ctx, &config.llm, &repo_name, node).await;
        };
        let content = if node.kind == NodeKind::File {
            match ctx.host.fetch_file(&project.repo_ref(), path).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(%path, "asking without file content: {e}");
                    None
                }
            }
        } else {
            None
        };
        ask_about_node(ctx, &config.llm, &repo_name, node, content.as_deref(), question).await
    })?
    .map_err(|e| e.to_string())?;

    writeln!(out, "{answer}").map_err(|e| format!("write error: {e}"))
}
