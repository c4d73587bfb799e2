//! Table assembly.
//!
//! Combines columns, reference clauses, unique constraints, indexes and
//! comments of one entity into a [`TableUnit`]: the complete statement block
//! for that table plus the tables it depends on.

use schemagen_core::{EngineResult, TableId};
use schemagen_ir::Entity;
use std::collections::BTreeSet;
use tracing::debug;

use crate::context::GenerationContext;
use crate::ddl::column::render_column;
use crate::ddl::comments::CommentCollector;
use crate::ddl::constraints::{build_indexes, build_unique_constraints};
use crate::ddl::create_table_statement;
use crate::ddl::references::{JoinTable, synthesize_join_table, synthesize_reference};

/// Everything needed to create one entity's table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableUnit {
    /// Identity of the table
    pub id: TableId,

    /// `CREATE TABLE` followed by index and comment statements
    pub statement: String,

    /// Tables referenced through constrained foreign keys
    pub dependencies: BTreeSet<TableId>,

    /// Join tables owned by this entity, emitted after all tables
    pub join_tables: Vec<JoinTable>,
}

/// Assemble the table unit of one entity
pub fn assemble_table(ctx: &GenerationContext<'_>, entity: &Entity) -> EngineResult<TableUnit> {
    let id = entity.table_id();
    let table_sql = ctx.table_sql(&id);
    let mut comments = CommentCollector::new(&table_sql, ctx.dialect().comment_style());

    let mut lines = Vec::with_capacity(entity.fields.len());
    let mut foreign_keys = Vec::new();
    let mut dependencies = BTreeSet::new();

    for field in &entity.fields {
        let column = render_column(ctx, &mut comments, entity, field)?;

        if field.is_reference() {
            let clause = synthesize_reference(ctx, entity, field)?;
            lines.push(column.finish(&clause.inline));
            foreign_keys.extend(clause.constraint);
            dependencies.extend(clause.dependency);
        } else {
            lines.push(column.finish(""));
        }
    }

    lines.extend(build_unique_constraints(ctx, entity)?);
    lines.extend(foreign_keys);

    let indexes = build_indexes(ctx, entity)?;

    let table_comment = match entity.description.as_deref() {
        Some(text) if !text.is_empty() => comments.table_comment(ctx, text),
        _ => String::new(),
    };

    let mut statements = vec![create_table_statement(ctx, &table_sql, &lines, &table_comment)];
    statements.extend(indexes);
    statements.extend(comments.take());

    let mut join_tables = Vec::new();
    for relationship in entity.many_to_many() {
        if let Some(join) = synthesize_join_table(ctx, entity, relationship)? {
            join_tables.push(join);
        }
    }

    debug!(
        table = %id,
        columns = entity.fields.len(),
        dependencies = dependencies.len(),
        join_tables = join_tables.len(),
        "assembled table"
    );

    Ok(TableUnit {
        id,
        statement: statements.join("\n"),
        dependencies,
        join_tables,
    })
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
    use schemagen_ir::{Field, ModelGraph, Relationship};

    fn model() -> ModelGraph {
        ModelGraph::new("Tables")
            .with_entity(Entity::new("Tournament"))
            .with_entity(Entity::new("Team"))
            .with_entity(
                Entity::new("Event")
                    .with_description("What's up")
                    .with_field(Field::new("name", DataType::Text).with_description("Event name"))
                    .with_field(Field::new("modified", DataType::DateTime).indexed())
                    .with_relationship(Relationship::foreign_key("tournament", "Tournament"))
                    .with_relationship(Relationship::many_to_many("participants", "Team"))
                    .with_unique_together(["name", "tournament"]),
            )
    }

    #[test]
    fn test_assemble_table_postgres() {
        let model = model();
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);

        let unit = assemble_table(&ctx, model.get_entity("Event").unwrap()).unwrap();
        assert_eq!(
            unit.statement,
            r#"CREATE TABLE IF NOT EXISTS "event" (
    "id" SERIAL NOT NULL PRIMARY KEY,
    "name" TEXT NOT NULL,
    "modified" TIMESTAMPTZ NOT NULL,
    "tournament_id" INT NOT NULL REFERENCES "tournament" ("id") ON DELETE CASCADE,
    CONSTRAINT "uid_event_name_71d1a3" UNIQUE ("name", "tournament_id")
);
CREATE INDEX IF NOT EXISTS "idx_event_modifie_4d77e3" ON "event" ("modified");
COMMENT ON COLUMN "event"."name" IS 'Event name';
COMMENT ON TABLE "event" IS 'What''s up';"#
        );
        assert_eq!(
            unit.dependencies.into_iter().collect::<Vec<_>>(),
            vec![TableId::unqualified("tournament")]
        );
        assert_eq!(unit.join_tables.len(), 1);
        assert_eq!(unit.join_tables[0].id, TableId::unqualified("event_team"));
    }

    #[test]
    fn test_assemble_table_mysql() {
        let model = model();
        let config = GeneratorConfig::new().with_database(DatabaseType::MySQL);
        let ctx = GenerationContext::new(&model, &config);

        let unit = assemble_table(&ctx, model.get_entity("Event").unwrap()).unwrap();
        assert_eq!(
            unit.statement,
            r#"CREATE TABLE IF NOT EXISTS `event` (
    `id` INT NOT NULL PRIMARY KEY AUTO_INCREMENT,
    `name` LONGTEXT NOT NULL COMMENT 'Event name',
    `modified` DATETIME(6) NOT NULL,
    `tournament_id` INT NOT NULL,
    CONSTRAINT `uid_event_name_71d1a3` UNIQUE (`name`, `tournament_id`),
    CONSTRAINT `fk_event_tourname_c3757249` FOREIGN KEY (`tournament_id`) REFERENCES `tournament` (`id`) ON DELETE CASCADE
) CHARACTER SET utf8mb4 COMMENT='What''s up';
CREATE INDEX `idx_event_modifie_4d77e3` ON `event` (`modified`);"#
        );
    }

    #[test]
    fn test_comments_do_not_leak_between_tables() {
        let model = ModelGraph::new("Isolation")
            .with_entity(Entity::new("Tournament").with_description("Tournaments"))
            .with_entity(Entity::new("Team").with_field(Field::new("name", DataType::Text)));
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);

        let tournament = assemble_table(&ctx, &model.entities[0]).unwrap();
        let team = assemble_table(&ctx, &model.entities[1]).unwrap();

        assert!(tournament.statement.ends_with("COMMENT ON TABLE \"tournament\" IS 'Tournaments';"));
        assert!(!team.statement.contains("COMMENT"));
    }

    #[test]
    fn test_self_reference_is_a_dependency() {
        let model = ModelGraph::new("Tree").with_entity(
            Entity::new("Category")
                .with_relationship(Relationship::foreign_key("parent", "Category").optional()),
        );
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);

        let unit = assemble_table(&ctx, &model.entities[0]).unwrap();
        assert!(unit.statement.contains(
            "\"parent_id\" INT REFERENCES \"category\" (\"id\") ON DELETE CASCADE"
        ));
        assert!(unit.dependencies.contains(&TableId::unqualified("category")));
    }
}
