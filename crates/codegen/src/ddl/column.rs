//! Column definitions.
//!
//! Renders one field into the line that goes inside `CREATE TABLE ( … )`:
//!
//! ```text
//! "name" VARCHAR(255) NOT NULL UNIQUE DEFAULT 'x'
//! "id" SERIAL NOT NULL PRIMARY KEY
//! ```

use schemagen_core::{EngineError, EngineResult};
use schemagen_ir::{DefaultValue, Entity, Field};
use tracing::debug;

use crate::context::{GenerationContext, escape_literal};
use crate::ddl::comments::CommentCollector;

/// A rendered column, waiting for an optional inline reference clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Physical column name
    pub column: String,
    body: String,
    inline_comment: String,
}

impl ColumnDef {
    /// Final column line, with the reference clause placed before any inline comment
    pub fn finish(self, reference_clause: &str) -> String {
        format!("{}{}{}", self.body, reference_clause, self.inline_comment)
    }
}

/// Render a field of `entity` into a column definition.
///
/// Column comments are routed through `comments`. A reference column uses the
/// description of its relationship when it has one.
pub fn render_column(
    ctx: &GenerationContext<'_>,
    comments: &mut CommentCollector,
    entity: &Entity,
    field: &Field,
) -> EngineResult<ColumnDef> {
    let dialect = ctx.dialect();
    let column = field.column_name.clone();

    let description = entity
        .relationship_for_field(field)
        .and_then(|r| r.description.as_deref())
        .or(field.description.as_deref());
    let inline_comment = match description {
        Some(text) if !text.is_empty() => comments.column_comment(ctx, &column, text),
        _ => String::new(),
    };

    if field.is_generated_pk() {
        if let Some(generated) = dialect.generated_pk_sql(&field.data_type) {
            return Ok(ColumnDef {
                body: format!("{} {}", ctx.quote(&column), generated),
                column,
                inline_comment,
            });
        }
        debug!(
            entity = %entity.name,
            column = %column,
            data_type = %field.data_type.display_name(),
            "dialect cannot generate this key type, rendering a plain primary key"
        );
    }

    let mut parts = vec![ctx.quote(&column), ctx.column_type(field)?];
    if !field.nullable {
        parts.push("NOT NULL".to_string());
    }
    if field.unique && !field.is_primary_key {
        parts.push("UNIQUE".to_string());
    }
    if field.is_primary_key {
        parts.push("PRIMARY KEY".to_string());
    }

    let default = match render_default(ctx, field) {
        Ok(default) => default,
        Err(EngineError::UnsupportedDefault { column, reason }) => {
            debug!(entity = %entity.name, column = %column, reason = %reason, "default left to the application");
            None
        }
        Err(e) => return Err(e),
    };
    if let Some(default) = default {
        parts.push(format!("DEFAULT {}", default));
    }

    Ok(ColumnDef {
        column,
        body: parts.join(" "),
        inline_comment,
    })
}

/// SQL literal for a field's default, `None` when no DDL default applies
pub fn render_default(ctx: &GenerationContext<'_>, field: &Field) -> EngineResult<Option<String>> {
    let Some(default) = &field.default_value else {
        return Ok(None);
    };
    if !field.data_type.inlines_default() {
        return Ok(None);
    }

    let dialect = ctx.dialect();
    let literal = match default {
        DefaultValue::Null => "NULL".to_string(),
        DefaultValue::Bool(b) => dialect.bool_literal(*b).to_string(),
        DefaultValue::Int(i) => i.to_string(),
        DefaultValue::Float(f) if f.is_finite() => f.to_string(),
        DefaultValue::Float(f) => {
            return Err(EngineError::unsupported_default(
                &field.column_name,
                format!("{} has no SQL literal", f),
            ));
        }
        DefaultValue::String(s) => format!("'{}'", escape_literal(s)),
        DefaultValue::AutoNowAdd => dialect.current_timestamp().to_string(),
        DefaultValue::AutoNow => return Ok(None),
        DefaultValue::Callable(name) => {
            return Err(EngineError::unsupported_default(
                &field.column_name,
                format!("callable default `{}` is evaluated by the application", name),
            ));
        }
        DefaultValue::Expression(expr) => expr.clone(),
    };

    Ok(Some(literal))
}

// ============================================================================
// Tests
// ============================================================================
