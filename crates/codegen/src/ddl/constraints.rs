//! Unique constraints, indexes and deterministic constraint names.
//!
//! Unique groups become `CONSTRAINT … UNIQUE (…)` fragments inside the table
//! body. Indexed fields and declared indexes become standalone
//! `CREATE [UNIQUE] INDEX` statements emitted right after the table.
//!
//! Generated names combine truncated table/column names with a short SHA-256
//! digest of the full inputs, so they are stable across runs and stay within
//! identifier length limits.

use schemagen_core::{EngineError, EngineResult};
use schemagen_ir::Entity;
use sha2::{Digest, Sha256};

use crate::context::GenerationContext;

// ============================================================================
// Naming
// ============================================================================

fn make_hash(parts: &[&str], length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parts.join(";").as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..length.min(digest.len())].to_string()
}

fn prefix_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Name for an index or unique constraint on `table` over `columns`.
///
/// `prefix` is `idx` for indexes, `uid` for unique constraints and `uidx`
/// for unique indexes.
pub fn index_name<S: AsRef<str>>(prefix: &str, table: &str, columns: &[S]) -> String {
    let mut parts = vec![table];
    parts.extend(columns.iter().map(AsRef::as_ref));

    let first = columns.first().map(AsRef::as_ref).unwrap_or_default();
    format!(
        "{}_{}_{}_{}",
        prefix,
        prefix_chars(table, 11),
        prefix_chars(first, 7),
        make_hash(&parts, 6)
    )
}

/// Name for a foreign key from `from_table.from_column` to `to_table.to_column`
pub fn fk_name(from_table: &str, from_column: &str, to_table: &str, to_column: &str) -> String {
    format!(
        "fk_{}_{}_{}",
        prefix_chars(from_table, 8),
        prefix_chars(to_table, 8),
        make_hash(&[from_table, from_column, to_table, to_column], 8)
    )
}

// ============================================================================
// Unique constraints
// ============================================================================

/// Resolve logical or column names to physical column names
fn resolve_columns(entity: &Entity, names: &[String], what: &str) -> EngineResult<Vec<String>> {
    if names.is_empty() {
        return Err(EngineError::entity_validation(
            &entity.name,
            format!("{} must list at least one column", what),
        ));
    }

    names
        .iter()
        .map(|name| entity.resolve_field(name).map(|f| f.column_name.clone()))
        .collect()
}

/// `CONSTRAINT "<name>" UNIQUE (…)` fragment per unique group, in declaration order
pub fn build_unique_constraints(
    ctx: &GenerationContext<'_>,
    entity: &Entity,
) -> EngineResult<Vec<String>> {
    entity
        .unique_together
        .iter()
        .map(|group| {
            let columns = resolve_columns(entity, &group.fields, "unique group")?;
            Ok(format!(
                "CONSTRAINT {} UNIQUE ({})",
                ctx.quote(&index_name("uid", &entity.table_name, &columns)),
                ctx.quote_list(&columns)
            ))
        })
        .collect()
}

// ============================================================================
// Indexes
// ============================================================================

/// Standalone `CREATE INDEX` statement
pub fn index_statement(
    ctx: &GenerationContext<'_>,
    table_sql: &str,
    name: &str,
    columns: &[String],
    unique: bool,
) -> String {
    format!(
        "CREATE {}INDEX {}{} ON {} ({});",
        if unique { "UNIQUE " } else { "" },
        ctx.index_if_not_exists(),
        ctx.quote(name),
        table_sql,
        ctx.quote_list(columns)
    )
}

/// Index statements for an entity: indexed fields first, then declared
/// indexes. Byte-identical statements are emitted once.
pub fn build_indexes(ctx: &GenerationContext<'_>, entity: &Entity) -> EngineResult<Vec<String>> {
    let table_sql = ctx.entity_table_sql(entity);
    let mut statements = Vec::new();

    for field in entity.indexed_fields() {
        let columns = vec![field.column_name.clone()];
        let name = index_name("idx", &entity.table_name, &columns);
        statements.push(index_statement(ctx, &table_sql, &name, &columns, false));
    }

    for index in &entity.indexes {
        let columns = resolve_columns(entity, &index.fields, "index")?;
        let name = match &index.name {
            Some(name) => name.clone(),
            None => {
                let prefix = if index.unique { "uidx" } else { "idx" };
                index_name(prefix, &entity.table_name, &columns)
            }
        };
        statements.push(index_statement(ctx, &table_sql, &name, &columns, index.unique));
    }

    Ok(dedup_preserving_order(statements))
}

fn dedup_preserving_order(statements: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(statements.len());
    for statement in statements {
        if !unique.contains(&statement) {
            unique.push(statement);
        }
    }
    unique
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use pretty_assertions::assert_eq;
    use schemagen_core::{DataType, DatabaseType};
    use schemagen_ir::{Field, IndexDef, ModelGraph, Relationship};

    fn event_model() -> ModelGraph {
        ModelGraph::new("Indexes")
            .with_entity(Entity::new("Tournament"))
            .with_entity(
                Entity::new("Event")
                    .with_field(Field::new("name", DataType::Text).indexed())
                    .with_field(Field::new("modified", DataType::DateTime).indexed())
                    .with_relationship(Relationship::foreign_key("tournament", "Tournament"))
                    .with_unique_together(["name", "tournament"])
                    .with_index(IndexDef::new(["name", "tournament_id"]))
                    .with_index(IndexDef::new(["name"])),
            )
    }

    #[test]
    fn test_index_names_are_stable() {
        assert_eq!(index_name("idx", "event", &["name"]), "idx_event_name_7b1c71");
        assert_eq!(index_name("idx", "event", &["modified"]), "idx_event_modifie_4d77e3");
        assert_eq!(
            index_name("uid", "event", &["name", "tournament_id"]),
            "uid_event_name_71d1a3"
        );
        assert_eq!(
            index_name("idx", "tournament_participants", &["registration_date"]),
            "idx_tournament__registr_f5931a"
        );
    }

    #[test]
    fn test_fk_names_are_stable() {
        assert_eq!(
            fk_name("event", "tournament_id", "tournament", "id"),
            "fk_event_tourname_c3757249"
        );
        assert_eq!(
            fk_name("event_team", "team_id", "team", "id"),
            "fk_event_te_team_f98f9a29"
        );
    }

    #[test]
    fn test_unique_constraints_resolve_logical_names() {
        let model = event_model();
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);
        let event = model.get_entity("Event").unwrap();

        assert_eq!(
            build_unique_constraints(&ctx, event).unwrap(),
            vec!["CONSTRAINT \"uid_event_name_71d1a3\" UNIQUE (\"name\", \"tournament_id\")".to_string()]
        );
    }

    #[test]
    fn test_indexes_deduplicate_in_order() {
        let model = event_model();
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);
        let event = model.get_entity("Event").unwrap();

        assert_eq!(
            build_indexes(&ctx, event).unwrap(),
            vec![
                "CREATE INDEX IF NOT EXISTS \"idx_event_name_7b1c71\" ON \"event\" (\"name\");".to_string(),
                "CREATE INDEX IF NOT EXISTS \"idx_event_modifie_4d77e3\" ON \"event\" (\"modified\");".to_string(),
                "CREATE INDEX IF NOT EXISTS \"idx_event_name_71d1a3\" ON \"event\" (\"name\", \"tournament_id\");".to_string(),
            ]
        );
    }

    #[test]
    fn test_unique_and_named_indexes() {
        let model = ModelGraph::new("Named").with_entity(
            Entity::new("Event")
                .with_field(Field::new("name", DataType::Text))
                .with_field(Field::new("prize", DataType::Int32))
                .with_index(IndexDef::new(["name", "prize"]).unique())
                .with_index(IndexDef::new(["prize"]).with_name("event_prize")),
        );
        let config = GeneratorConfig::new().with_database(DatabaseType::MySQL);
        let ctx = GenerationContext::new(&model, &config);

        let statements = build_indexes(&ctx, &model.entities[0]).unwrap();
        assert_eq!(
            statements[0],
            format!(
                "CREATE UNIQUE INDEX `{}` ON `event` (`name`, `prize`);",
                index_name("uidx", "event", &["name", "prize"])
            )
        );
        assert_eq!(statements[1], "CREATE INDEX `event_prize` ON `event` (`prize`);");
    }

    #[test]
    fn test_unknown_index_column_is_fatal() {
        let model = ModelGraph::new("Broken")
            .with_entity(Entity::new("Event").with_index(IndexDef::new(["missing"])));
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);

        let err = build_indexes(&ctx, &model.entities[0]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownColumn { .. }));
        assert!(err.is_model_error());
    }

    #[test]
    fn test_empty_unique_group_is_fatal() {
        let model = ModelGraph::new("Broken").with_entity(
            Entity::new("Event").with_unique_together(Vec::<String>::new()),
        );
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);

        let err = build_unique_constraints(&ctx, &model.entities[0]).unwrap_err();
        assert!(err.is_model_error());
    }
}
