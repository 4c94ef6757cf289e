//! `devlens schema` command: entity extraction on a local file.

use std::io::Write;
use std::path::Path;

use crate::cli::DialectArg;
use crate::schema::{dialect_for_file, extract_entities_from_bytes, Dialect};

use super::write_json;

/// Prints the entities declared in `file` as JSON.
///
/// # Errors
///
/// Returns an error string if the file cannot be read, is not UTF-8, or its
/// dialect cannot be determined.
pub fn run(file: &Path, dialect: Option<DialectArg>, out: &mut impl Write) -> Result<(), String> {
    let dialect = match dialect {
        Some(DialectArg::Prisma) => Dialect::BlockDsl,
        Some(DialectArg::Django) => Dialect::ClassDsl,
        None => file
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(dialect_for_file)
            .ok_or_else(|| format!("cannot tell the schema dialect of {}; pass --dialect", file.display()))?,
    };
    let bytes = std::fs::read(file).map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let entities = extract_entities_from_bytes(&bytes, dialect).map_err(|e| e.to_string())?;
    write_json(out, &entities)
}
