//! Prisma-style `model` block extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::{Cardinality, Entity, Field, Relation};

/// A `model Name { ... }` block. The body ends at the first closing brace;
/// model bodies never nest braces.
static MODEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*model[ \t]+(\w+)[ \t]*\{([^}]*)\}").unwrap());

/// `name Type[]? @decorators...` on a trimmed body line.
static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s+(\w+)(\[\])?(\?)?(?:\s+(.*))?$").unwrap());

/// Built-in scalar type names; any other capitalized type is a model reference.
const SCALAR_TYPES: &[&str] = &[
    "String",
    "Int",
    "BigInt",
    "Boolean",
    "DateTime",
    "Float",
    "Json",
    "Decimal",
    "Bytes",
    "Unsupported",
];

pub(super) fn extract(source: &str) -> Vec<Entity> {
    MODEL_RE
        .captures_iter(source)
        .map(|caps| {
            let mut entity = Entity::named(&caps[1]);
            for line in caps[2].lines() {
                parse_line(line.trim(), &mut entity);
            }
            entity
        })
        .collect()
}

fn parse_line(line: &str, entity: &mut Entity) {
    if line.starts_with("@@") {
        entity.indexes.push(line.to_string());
        return;
    }
    let Some(caps) = FIELD_RE.captures(line) else {
        return;
    };
    let name = &caps[1];
    let type_name = &caps[2];
    let is_array = caps.get(3).is_some();
    let decorators = caps.get(5).map_or("", |m| m.as_str());

    if is_model_reference(type_name) {
        entity.relations.push(Relation {
            target: type_name.to_string(),
            cardinality: if is_array { Cardinality::OneToMany } else { Cardinality::OneToOne },
            name: None,
        });
    } else {
        entity.fields.push(Field {
            name: name.to_string(),
            field_type: if is_array { format!("{type_name}[]") } else { type_name.to_string() },
            is_primary_key: decorators.contains("@id"),
            is_unique: decorators.contains("@unique"),
        });
    }
}

fn is_model_reference(type_name: &str) -> bool {
    type_name.starts_with(|c: char| c.is_ascii_uppercase()) && !SCALAR_TYPES.contains(&type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_two_model_sample() {
        let source = "model User { id Int @id \n posts Post[] } \n model Post { id Int @id \n author User }";
        let entities = extract(source);
        assert_eq!(entities.len(), 2);

        let user = &entities[0];
        assert_eq!(user.name, "User");
        assert_eq!(
            user.fields,
            vec![Field {
                name: "id".into(),
                field_type: "Int".into(),
                is_primary_key: true,
                is_unique: false
            }]
        );
        assert_eq!(
            user.relations,
            vec![Relation { target: "Post".into(), cardinality: Cardinality::OneToMany, name: None }]
        );

        let post = &entities[1];
        assert_eq!(post.name, "Post");
        assert_eq!(post.fields.len(), 1);
        assert_eq!(
            post.relations,
            vec![Relation { target: "User".into(), cardinality: Cardinality::OneToOne, name: None }]
        );
    }

    #[test]
    fn realistic_schema() {
        let source = r#"
datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

generator client {
  provider = "prisma-client-js"
}

model Account {
  id        String   @id @default(cuid())
  email     String   @unique
  nickname  String?
  tags      String[]
  createdAt DateTime @default(now())
  profile   Profile?
  orders    Order[]
  // legacy column
  ownerId   Int      @relation(fields: [ownerId], references: [id])

  @@index([email])
  @@unique([email, nickname])
}

enum Role {
  USER
  ADMIN
}
"#;
        let entities = extract(source);
        assert_eq!(entities.len(), 1);
        let account = &entities[0];
        assert_eq!(account.name, "Account");

        let names: Vec<&str> = account.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "nickname", "tags", "createdAt", "ownerId"]);
        assert!(account.fields[0].is_primary_key);
        assert!(!account.fields[0].is_unique);
        assert!(account.fields[1].is_unique);
        assert_eq!(account.fields[3].field_type, "String[]");

        assert_eq!(account.relations.len(), 2);
        assert_eq!(account.relations[0].target, "Profile");
        assert_eq!(account.relations[0].cardinality, Cardinality::OneToOne);
        assert_eq!(account.relations[1].target, "Order");
        assert_eq!(account.relations[1].cardinality, Cardinality::OneToMany);

        assert_eq!(account.indexes, vec!["@@index([email])", "@@unique([email, nickname])"]);
    }

    #[test]
    fn lowercase_types_stay_scalar() {
        let entities = extract("model Legacy {\n  code citext\n}");
        assert_eq!(entities[0].fields[0].field_type, "citext");
        assert!(entities[0].relations.is_empty());
    }

    #[test]
    fn keyword_must_start_declaration() {
        assert!(extract("// model Ghost { id Int }\n").is_empty());
        assert!(extract("remodel Thing { id Int }").is_empty());
    }
}
