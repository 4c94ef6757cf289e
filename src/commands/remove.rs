//! `devlens remove` command.

use std::io::Write;

use crate::config::LensConfig;
use crate::context::ServiceContext;
use crate::store::ProjectStore;

/// Deletes the project `id` from the store.
///
/// # Errors
///
/// Returns an error string if no such project exists or it cannot be removed.
pub fn run(ctx: &ServiceContext, config: &LensConfig, id: &str, out: &mut impl Write) -> Result<(), String> {
    ProjectStore::new(ctx, &config.store_root).remove(id).map_err(|e| e.to_string())?;
    writeln!(out, "Removed {id}").map_err(|e| format!("write error: {e}"))
}
