//! `devlens import` command.

use std::io::Write;

use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::project::import_project;
use crate::store::ProjectStore;

/// Registers `url` as a new project, optionally syncing it straight away.
///
/// # Errors
///
/// Returns an error string for an invalid URL, a store failure, or a failed sync.
pub fn run(
    ctx: &ServiceContext,
    config: &LensConfig,
    url: &str,
    token: Option<&str>,
    sync: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &config.store_root);
    let project = import_project(ctx, &store, url, token.map(String::from)).map_err(|e| e.to_string())?;
    ctx.label_recording(&project.slug());
    writeln!(out, "Imported {} as {}", project.slug(), project.id).map_err(|e| format!("write error: {e}"))?;

    if sync {
        super::sync::run(ctx, config, &project.id, out)?;
    }
    Ok(())
}
