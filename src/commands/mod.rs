//! Command dispatch and handlers.
//!
//! Handlers write their output to a caller-supplied writer and report
//! failures as strings; the binary turns those into exit code 1.

pub mod analyze;
pub mod import;
pub mod outline;
pub mod remove;
pub mod schema;
pub mod show;
pub mod sync;

use std::env;
use std::future::Future;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::cli::Command;
use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::hierarchy::TreeIndex;
use crate::project::RepoProject;

/// Dispatch a parsed command to its handler, printing to stdout.
///
/// When `DEVLENS_RECORD` is set to a file path, every port interaction is
/// recorded to a cassette at that path.
///
/// # Errors
///
/// Returns an error string if configuration loading or the handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Offline commands need neither configuration nor ports.
    match command {
        Command::Schema { file, dialect } => return schema::run(file, *dialect, &mut out),
        Command::OutlineFile { file } => return outline::run_file(file, &mut out),
        _ => {}
    }

    let config = LensConfig::load()?;
    let ctx = match env::var("DEVLENS_RECORD") {
        Ok(path) if !path.is_empty() => ServiceContext::recording(Path::new(&path), &config),
        _ => ServiceContext::live(&config),
    };
    dispatch_with_context(command, &ctx, &config, &mut out)
}

/// Dispatch a command with the given service context and configuration.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &LensConfig,
    out: &mut impl Write,
) -> Result<(), String> {
    match command {
        Command::Import { url, token, sync } => import::run(ctx, config, url, token.as_deref(), *sync, out),
        Command::List => show::list(ctx, config, out),
        Command::Sync { id } => sync::run(ctx, config, id, out),
        Command::Show { id, section } => show::run(ctx, config, id, *section, out),
        Command::Outline { id, path, save } => outline::run(ctx, config, id, path, *save, out),
        Command::Analyze { id } => analyze::run(ctx, config, id, out),
        Command::Ask { id, path, question } => analyze::ask(ctx, config, id, path, question.as_deref(), out),
        Command::Remove { id } => remove::run(ctx, config, id, out),
        Command::Schema { file, dialect } => schema::run(file, *dialect, out),
        Command::OutlineFile { file } => outline::run_file(file, out),
    }
}

/// Drives `future` to completion on a fresh current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

/// Pretty-prints `value` as JSON.
pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| format!("failed to encode output: {e}"))?;
    writeln!(out, "{json}").map_err(|e| format!("write error: {e}"))
}

/// The project's synced tree, indexed for lookups.
pub(crate) fn synced_index(project: &RepoProject) -> Result<TreeIndex, String> {
    project.tree.clone().map(TreeIndex::new).ok_or_else(|| {
        format!("project {} has not been synced yet; run `devlens sync {}`", project.id, project.id)
    })
}
