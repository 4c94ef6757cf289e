//! Data-model extraction from ORM declaration files.
//!
//! Two dialects are recognized by file name: Prisma-style `model` blocks and
//! Django-style `models.Model` classes. Both extractors are line heuristics
//! over free-form text; anything that does not match is skipped.

pub mod django;
pub mod prisma;

use serde::{Deserialize, Serialize};

use crate::error::{LensError, Result};

/// Input dialect for schema extraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// `model Name { ... }` blocks.
    BlockDsl,
    /// `class Name(models.Model):` classes.
    ClassDsl,
}

/// Relation multiplicity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// One-to-one.
    OneToOne,
    /// One-to-many.
    OneToMany,
    /// Many-to-many.
    ManyToMany,
}

/// A scalar member of an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Member name.
    pub name: String,
    /// Declared type as written (`Int`, `String[]`, `CharField`).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Marked as the primary key.
    pub is_primary_key: bool,
    /// Marked unique.
    pub is_unique: bool,
}

/// A member of an entity that points at another entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relation {
    /// Name of the target entity; not checked against the extracted set.
    pub target: String,
    /// Relation multiplicity.
    pub cardinality: Cardinality,
    /// Reverse accessor name, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One extracted model declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    /// Declared model name.
    pub name: String,
    /// Scalar fields in line order.
    pub fields: Vec<Field>,
    /// Relations in line order.
    pub relations: Vec<Relation>,
    /// Block-level index and uniqueness directives, verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<String>,
}

impl Entity {
    fn named(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }
}

/// Picks the dialect for a model file by its exact file name.
#[must_use]
pub fn dialect_for_file(file_name: &str) -> Option<Dialect> {
    match file_name {
        "schema.prisma" => Some(Dialect::BlockDsl),
        "models.py" => Some(Dialect::ClassDsl),
        _ => None,
    }
}

/// Extracts every entity declared in `source`, in declaration order.
#[must_use]
pub fn extract_entities(source: &str, dialect: Dialect) -> Vec<Entity> {
    match dialect {
        Dialect::BlockDsl => prisma::extract(source),
        Dialect::ClassDsl => django::extract(source),
    }
}

/// Like [`extract_entities`] for raw file bytes.
///
/// # Errors
///
/// Returns [`LensError::InvalidInput`] when `bytes` is not UTF-8.
pub fn extract_entities_from_bytes(bytes: &[u8], dialect: Dialect) -> Result<Vec<Entity>> {
    let source = std::str::from_utf8(bytes).map_err(|e| LensError::not_utf8("schema", &e))?;
    Ok(extract_entities(source, dialect))
}
