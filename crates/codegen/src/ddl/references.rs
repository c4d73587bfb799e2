//! Foreign keys and many-to-many join tables.
//!
//! A constrained reference yields a `REFERENCES` clause (inline, or as a
//! table-level `FOREIGN KEY` constraint where the dialect ignores inline
//! references) and a dependency edge on the target table. An unconstrained
//! reference yields neither; the column is still rendered.

use schemagen_core::{EngineResult, ReferentialAction, TableId};
use schemagen_ir::{Entity, Field, Relationship};
use tracing::debug;

use crate::context::GenerationContext;
use crate::ddl::comments::CommentCollector;
use crate::ddl::constraints::{fk_name, index_name, index_statement};
use crate::ddl::create_table_statement;

// ============================================================================
// Single-valued references
// ============================================================================

/// What a reference column contributes to its table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceClause {
    /// Appended to the column definition
    pub inline: String,
    /// Table-level `CONSTRAINT … FOREIGN KEY …` fragment
    pub constraint: Option<String>,
    /// Table that must exist before the owning table
    pub dependency: Option<TableId>,
}

impl ReferenceClause {
    /// A column with no database-level constraint
    pub fn logical() -> Self {
        Self::default()
    }
}

fn render_reference(
    ctx: &GenerationContext<'_>,
    from_table: &str,
    column: &str,
    target: &Entity,
    to_column: &str,
    on_delete: ReferentialAction,
) -> ReferenceClause {
    let references = format!(
        "REFERENCES {} ({}) ON DELETE {}",
        ctx.entity_table_sql(target),
        ctx.quote(to_column),
        on_delete.to_sql()
    );

    let (inline, constraint) = if ctx.dialect().inline_references() {
        (format!(" {}", references), None)
    } else {
        let name = fk_name(from_table, column, &target.table_name, to_column);
        let constraint = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) {}",
            ctx.quote(&name),
            ctx.quote(column),
            references
        );
        (String::new(), Some(constraint))
    };

    ReferenceClause {
        inline,
        constraint,
        dependency: Some(target.table_id()),
    }
}

/// Reference clause for a column of `entity`.
///
/// Columns that are not owned by a relationship, and relationships declared
/// without a database constraint, are logical only.
pub fn synthesize_reference(
    ctx: &GenerationContext<'_>,
    entity: &Entity,
    field: &Field,
) -> EngineResult<ReferenceClause> {
    let Some(relationship) = entity.relationship_for_field(field) else {
        return Ok(ReferenceClause::logical());
    };
    if !relationship.db_constraint {
        debug!(
            entity = %entity.name,
            column = %field.column_name,
            target = %relationship.to_entity,
            "reference without database constraint"
        );
        return Ok(ReferenceClause::logical());
    }

    let target = ctx.require_entity(&relationship.to_entity)?;
    let to_column = &target.referenced_field(relationship.target_field())?.column_name;

    Ok(render_reference(
        ctx,
        &entity.table_name,
        &field.column_name,
        target,
        to_column,
        relationship.on_delete,
    ))
}

// ============================================================================
// Join tables
// ============================================================================

/// A synthesized many-to-many join table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    /// Identity of the join table
    pub id: TableId,
    /// Creation statement followed by its index and comment statements
    pub statement: String,
}

/// Join table for a many-to-many relationship owned by `owner`.
///
/// Returns `None` when a declared entity already uses the join table's
/// physical name; that entity is created like any other table.
pub fn synthesize_join_table(
    ctx: &GenerationContext<'_>,
    owner: &Entity,
    relationship: &Relationship,
) -> EngineResult<Option<JoinTable>> {
    let id = TableId::new(
        owner.namespace.as_deref(),
        relationship.junction_table_for(owner),
    );
    if ctx.model().entity_by_table(&id).is_some() {
        debug!(
            owner = %owner.name,
            table = %id,
            "join table is a declared entity, not synthesizing"
        );
        return Ok(None);
    }

    let target = ctx.require_entity(&relationship.to_entity)?;
    let table_sql = ctx.table_sql(&id);
    let mut comments = CommentCollector::new(&table_sql, ctx.dialect().comment_style());

    let sides = [
        (relationship.backward_key_for(owner), owner),
        (relationship.forward_key_name(), target),
    ];

    let mut lines = Vec::with_capacity(4);
    let mut constraints = Vec::new();
    let mut columns = Vec::with_capacity(2);
    for (column, side) in &sides {
        let sql_type = ctx.primary_key_type(side)?;
        let mut line = format!("{} {} NOT NULL", ctx.quote(column), sql_type);

        if relationship.db_constraint {
            let to_column = &side.referenced_field(None)?.column_name;
            let clause = render_reference(
                ctx,
                &id.table,
                column,
                side,
                to_column,
                relationship.on_delete,
            );
            line.push_str(&clause.inline);
            constraints.extend(clause.constraint);
        }

        lines.push(line);
        columns.push(column.clone());
    }
    lines.extend(constraints);

    let comment = match relationship.description.as_deref() {
        Some(text) if !text.is_empty() => comments.table_comment(ctx, text),
        _ => String::new(),
    };

    let mut statements = vec![create_table_statement(ctx, &table_sql, &lines, &comment)];
    if relationship.unique_pairs {
        let name = index_name("uidx", &id.table, &columns);
        statements.push(index_statement(ctx, &table_sql, &name, &columns, true));
    }
    statements.extend(comments.take());

    Ok(Some(JoinTable {
        id,
        statement: statements.join("\n"),
    }))
}

// ============================================================================
// Tests
// ============================================================================
