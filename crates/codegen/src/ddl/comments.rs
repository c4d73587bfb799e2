//! Table and column comments.
//!
//! A `CommentCollector` is scoped to one table. Dialects with
//! [`CommentStyle::Statement`] get `COMMENT ON` statements queued for output
//! after the table; the other styles get a fragment to inline and nothing is
//! queued.

use crate::context::GenerationContext;
use crate::dialect::CommentStyle;

/// Accumulates the comments of one table
#[derive(Debug, Clone)]
pub struct CommentCollector {
    table_sql: String,
    style: CommentStyle,
    column_comments: Vec<String>,
    table_comment: Option<String>,
}

impl CommentCollector {
    /// Collector for the given quoted table name
    pub fn new(table_sql: impl Into<String>, style: CommentStyle) -> Self {
        Self {
            table_sql: table_sql.into(),
            style,
            column_comments: Vec::new(),
            table_comment: None,
        }
    }

    /// Comment on a column. Returns the fragment to append to the column
    /// definition, which is empty for statement-style dialects.
    pub fn column_comment(&mut self, ctx: &GenerationContext<'_>, column: &str, text: &str) -> String {
        let text = ctx.escape_comment(text);
        match self.style {
            CommentStyle::Statement => {
                let statement = format!(
                    "COMMENT ON COLUMN {}.{} IS '{}';",
                    self.table_sql,
                    ctx.quote(column),
                    text
                );
                if !self.column_comments.contains(&statement) {
                    self.column_comments.push(statement);
                }
                String::new()
            }
            CommentStyle::Inline => format!(" COMMENT '{}'", text),
            CommentStyle::Block => format!(" /* {} */", text),
        }
    }

    /// Comment on the table itself. Returns the fragment to place after the
    /// closing parenthesis, empty for statement-style dialects.
    pub fn table_comment(&mut self, ctx: &GenerationContext<'_>, text: &str) -> String {
        let text = ctx.escape_comment(text);
        match self.style {
            CommentStyle::Statement => {
                self.table_comment = Some(format!(
                    "COMMENT ON TABLE {} IS '{}';",
                    self.table_sql, text
                ));
                String::new()
            }
            CommentStyle::Inline => format!(" COMMENT='{}'", text),
            CommentStyle::Block => format!(" /* {} */", text),
        }
    }

    /// Queued statements: column comments first, then the table comment
    pub fn take(self) -> Vec<String> {
        let mut statements = self.column_comments;
        statements.extend(self.table_comment);
        statements
    }
}

// ============================================================================
// Tests
// ============================================================================
