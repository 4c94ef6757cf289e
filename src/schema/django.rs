//! Django-style `models.Model` class extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::{Cardinality, Entity, Field, Relation};

static MODEL_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(\w+)\s*\(\s*models\.Model\s*\)\s*:").unwrap());

static TOP_LEVEL_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^class\b").unwrap());

/// `name = models.Type(args`; the closing parenthesis may sit on a later line.
static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w+)\s*=\s*models\.(\w+)\((.*)$").unwrap());

static RELATED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"related_name\s*=\s*['"]([^'"]*)['"]"#).unwrap());

pub(super) fn extract(source: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut current: Option<Entity> = None;

    for line in source.lines() {
        if TOP_LEVEL_CLASS_RE.is_match(line) {
            entities.extend(current.take());
            current = MODEL_CLASS_RE.captures(line).map(|caps| Entity::named(&caps[1]));
            continue;
        }
        if let Some(entity) = current.as_mut() {
            parse_line(line, entity);
        }
    }
    entities.extend(current);
    entities
}

fn parse_line(line: &str, entity: &mut Entity) {
    if line.contains("indexes =") || line.contains("unique_together =") {
        entity.indexes.push(line.trim().to_string());
        return;
    }
    let Some(caps) = FIELD_RE.captures(line) else {
        return;
    };
    let name = &caps[1];
    let field_type = &caps[2];
    let args = caps[3].trim().trim_end_matches(':').trim_end();
    let args = args.strip_suffix(')').unwrap_or(args);

    let cardinality = match field_type {
        "ForeignKey" => Some(Cardinality::OneToMany),
        "OneToOneField" => Some(Cardinality::OneToOne),
        "ManyToManyField" => Some(Cardinality::ManyToMany),
        _ => None,
    };

    match cardinality {
        Some(cardinality) => entity.relations.push(Relation {
            target: relation_target(args, &entity.name),
            cardinality,
            name: RELATED_NAME_RE.captures(args).map(|c| c[1].to_string()),
        }),
        None => entity.fields.push(Field {
            name: name.to_string(),
            field_type: field_type.to_string(),
            is_primary_key: args.contains("primary_key=True"),
            is_unique: args.contains("unique=True"),
        }),
    }
}

/// First positional argument of a relation field, unquoted.
///
/// `'self'` names the declaring model and quoted `app.Model` labels keep the
/// model part.
fn relation_target(args: &str, owner: &str) -> String {
    let first = args.split(',').next().unwrap_or_default().trim();
    let first = first
        .strip_prefix("to")
        .and_then(|rest| rest.trim_start().strip_prefix('='))
        .map_or(first, str::trim);
    if first.is_empty() || first.contains('=') {
        return "Unknown".to_string();
    }

    let quoted = first.len() >= 2
        && (first.starts_with('\'') || first.starts_with('"'))
        && first.ends_with(first.chars().next().unwrap_or('\''));
    if !quoted {
        return first.to_string();
    }

    let label = &first[1..first.len() - 1];
    match label {
        "self" => owner.to_string(),
        _ => label.rsplit('.').next().unwrap_or(label).to_string(),
    }
}
