//! # SQL Dialects
//!
//! A [`Dialect`] supplies everything database-specific that the DDL
//! components need: identifier quoting, type names, the generated primary
//! key fragment, literals and the way comments are attached.
//!
//! Three dialects are built in and selected by [`DatabaseType`]:
//!
//! | dialect    | quote | comments                 | namespaces | FK placement      |
//! |------------|-------|--------------------------|------------|-------------------|
//! | PostgreSQL | `"`   | `COMMENT ON` statements  | yes        | inline            |
//! | MySQL      | `` ` `` | inline `COMMENT '…'`   | yes        | table constraint  |
//! | SQLite     | `"`   | `/* … */` blocks         | no         | inline            |

use schemagen_core::{DataType, DatabaseType, EngineError, EngineResult, TableId};

// ============================================================================
// CommentStyle
// ============================================================================

/// How table and column descriptions reach the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Separate `COMMENT ON …` statements after the table
    Statement,
    /// `COMMENT '…'` on the column, `COMMENT='…'` on the table
    Inline,
    /// `/* … */` next to the column or table
    Block,
}

// ============================================================================
// Dialect trait
// ============================================================================

/// Database-specific rendering rules
pub trait Dialect: std::fmt::Debug + Send + Sync {
    /// Database this dialect targets
    fn database(&self) -> DatabaseType;

    /// Identifier quote character
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quote an identifier, doubling embedded quote characters
    fn quote(&self, ident: &str) -> String {
        let q = self.quote_char();
        let escaped = ident.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Qualified, quoted table name
    fn table_name(&self, table: &TableId) -> String {
        match &table.namespace {
            Some(ns) => format!("{}.{}", self.quote(ns), self.quote(&table.table)),
            None => self.quote(&table.table),
        }
    }

    /// Column type for a concrete data type.
    ///
    /// References must be resolved to the referenced column's type first.
    fn sql_type(&self, data_type: &DataType) -> EngineResult<String>;

    /// Complete column clause for a database-generated primary key of the
    /// given type, or `None` when the type cannot be generated
    fn generated_pk_sql(&self, data_type: &DataType) -> Option<&'static str>;

    /// Literal for the current timestamp
    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Boolean literal
    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// How comments are attached
    fn comment_style(&self) -> CommentStyle;

    /// Whether `REFERENCES` clauses are honoured on the column itself.
    /// When false, foreign keys become table-level constraints.
    fn inline_references(&self) -> bool {
        true
    }

    /// Whether tables can be placed in named namespaces
    fn supports_namespaces(&self) -> bool {
        true
    }

    /// Whether `CREATE INDEX` accepts `IF NOT EXISTS`
    fn index_if_not_exists(&self) -> bool {
        true
    }

    /// Text appended after the closing parenthesis of `CREATE TABLE`
    fn table_suffix(&self) -> &'static str {
        ""
    }
}

/// Get the built-in dialect for a database
pub fn dialect_for(database: DatabaseType) -> Box<dyn Dialect> {
    match database {
        DatabaseType::PostgreSQL => Box::new(PostgresDialect),
        DatabaseType::MySQL => Box::new(MySqlDialect),
        DatabaseType::SQLite => Box::new(SqliteDialect),
    }
}

/// Length of the longest enum variant, used for VARCHAR enum columns
fn enum_width(variants: &[String]) -> usize {
    variants
        .iter()
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(1)
}

fn unresolved_reference(data_type: &DataType) -> EngineError {
    EngineError::internal(format!(
        "reference type {} reached the dialect unresolved",
        data_type.display_name()
    ))
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// PostgreSQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn database(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
    }

    fn sql_type(&self, data_type: &DataType) -> EngineResult<String> {
        Ok(match data_type {
            DataType::String => "VARCHAR(255)".into(),
            DataType::Varchar(n) => format!("VARCHAR({})", n),
            DataType::Text => "TEXT".into(),
            DataType::Int16 => "SMALLINT".into(),
            DataType::Int32 => "INT".into(),
            DataType::Int64 => "BIGINT".into(),
            DataType::Float32 => "REAL".into(),
            DataType::Float64 => "DOUBLE PRECISION".into(),
            DataType::Decimal {
                max_digits,
                decimal_places,
            } => format!("DECIMAL({},{})", max_digits, decimal_places),
            DataType::Bool => "BOOL".into(),
            DataType::Uuid => "UUID".into(),
            DataType::DateTime => "TIMESTAMPTZ".into(),
            DataType::Date => "DATE".into(),
            DataType::Time => "TIMETZ".into(),
            DataType::Duration => "BIGINT".into(),
            DataType::Bytes => "BYTEA".into(),
            DataType::Json => "JSONB".into(),
            DataType::Array(inner) => format!("{}[]", self.sql_type(inner)?),
            DataType::Enum { variants, .. } => format!("VARCHAR({})", enum_width(variants)),
            DataType::Reference { .. } => return Err(unresolved_reference(data_type)),
        })
    }

    fn generated_pk_sql(&self, data_type: &DataType) -> Option<&'static str> {
        match data_type {
            DataType::Int16 => Some("SMALLSERIAL NOT NULL PRIMARY KEY"),
            DataType::Int32 => Some("SERIAL NOT NULL PRIMARY KEY"),
            DataType::Int64 => Some("BIGSERIAL NOT NULL PRIMARY KEY"),
            _ => None,
        }
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Statement
    }
}

// ============================================================================
// MySQL
// ============================================================================

/// MySQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn database(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn sql_type(&self, data_type: &DataType) -> EngineResult<String> {
        Ok(match data_type {
            DataType::String => "VARCHAR(255)".into(),
            DataType::Varchar(n) => format!("VARCHAR({})", n),
            DataType::Text => "LONGTEXT".into(),
            DataType::Int16 => "SMALLINT".into(),
            DataType::Int32 => "INT".into(),
            DataType::Int64 => "BIGINT".into(),
            DataType::Float32 => "FLOAT".into(),
            DataType::Float64 => "DOUBLE".into(),
            DataType::Decimal {
                max_digits,
                decimal_places,
            } => format!("DECIMAL({},{})", max_digits, decimal_places),
            DataType::Bool => "BOOL".into(),
            DataType::Uuid => "CHAR(36)".into(),
            DataType::DateTime => "DATETIME(6)".into(),
            DataType::Date => "DATE".into(),
            DataType::Time => "TIME(6)".into(),
            DataType::Duration => "BIGINT".into(),
            DataType::Bytes => "LONGBLOB".into(),
            DataType::Json | DataType::Array(_) => "JSON".into(),
            DataType::Enum { variants, .. } => format!("VARCHAR({})", enum_width(variants)),
            DataType::Reference { .. } => return Err(unresolved_reference(data_type)),
        })
    }

    fn generated_pk_sql(&self, data_type: &DataType) -> Option<&'static str> {
        match data_type {
            DataType::Int16 => Some("SMALLINT NOT NULL PRIMARY KEY AUTO_INCREMENT"),
            DataType::Int32 => Some("INT NOT NULL PRIMARY KEY AUTO_INCREMENT"),
            DataType::Int64 => Some("BIGINT NOT NULL PRIMARY KEY AUTO_INCREMENT"),
            _ => None,
        }
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP(6)"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Inline
    }

    fn inline_references(&self) -> bool {
        false
    }

    fn index_if_not_exists(&self) -> bool {
        false
    }

    fn table_suffix(&self) -> &'static str {
        " CHARACTER SET utf8mb4"
    }
}

// ============================================================================
// SQLite
// ============================================================================

/// SQLite dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn database(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    fn sql_type(&self, data_type: &DataType) -> EngineResult<String> {
        Ok(match data_type {
            DataType::String => "VARCHAR(255)".into(),
            DataType::Varchar(n) => format!("VARCHAR({})", n),
            DataType::Text => "TEXT".into(),
            DataType::Int16 => "SMALLINT".into(),
            DataType::Int32 => "INT".into(),
            DataType::Int64 => "BIGINT".into(),
            DataType::Float32 | DataType::Float64 => "REAL".into(),
            DataType::Decimal { .. } => "VARCHAR(40)".into(),
            DataType::Bool => "INT".into(),
            DataType::Uuid => "CHAR(36)".into(),
            DataType::DateTime => "TIMESTAMP".into(),
            DataType::Date => "DATE".into(),
            DataType::Time => "TIME".into(),
            DataType::Duration => "BIGINT".into(),
            DataType::Bytes => "BLOB".into(),
            DataType::Json | DataType::Array(_) => "JSON".into(),
            DataType::Enum { variants, .. } => format!("VARCHAR({})", enum_width(variants)),
            DataType::Reference { .. } => return Err(unresolved_reference(data_type)),
        })
    }

    fn generated_pk_sql(&self, data_type: &DataType) -> Option<&'static str> {
        // SQLite only auto-increments INTEGER PRIMARY KEY
        if data_type.is_integer() {
            Some("INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL")
        } else {
            None
        }
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Block
    }

    fn supports_namespaces(&self) -> bool {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_for() {
        for db in DatabaseType::all() {
            assert_eq!(dialect_for(*db).database(), *db);
        }
    }

    #[test]
    fn test_quote_and_table_name() {
        let pg = PostgresDialect;
        assert_eq!(pg.quote("team"), "\"team\"");
        assert_eq!(pg.quote("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(
            pg.table_name(&TableId::new(Some("test_schema"), "event")),
            "\"test_schema\".\"event\""
        );

        let my = MySqlDialect;
        assert_eq!(my.table_name(&TableId::unqualified("event")), "`event`");
    }

    #[test]
    fn test_sql_type_postgres() {
        let pg = PostgresDialect;
        assert_eq!(pg.sql_type(&DataType::Int16).unwrap(), "SMALLINT");
        assert_eq!(pg.sql_type(&DataType::Varchar(100)).unwrap(), "VARCHAR(100)");
        assert_eq!(pg.sql_type(&DataType::DateTime).unwrap(), "TIMESTAMPTZ");
        assert_eq!(
            pg.sql_type(&DataType::Array(Box::new(DataType::Int32))).unwrap(),
            "INT[]"
        );
        assert_eq!(
            pg.sql_type(&DataType::Enum {
                name: "Status".into(),
                variants: vec!["on".into(), "paused".into()],
            })
            .unwrap(),
            "VARCHAR(6)"
        );
    }

    #[test]
    fn test_sql_type_mysql_and_sqlite() {
        assert_eq!(MySqlDialect.sql_type(&DataType::Text).unwrap(), "LONGTEXT");
        assert_eq!(MySqlDialect.sql_type(&DataType::Uuid).unwrap(), "CHAR(36)");
        assert_eq!(SqliteDialect.sql_type(&DataType::Bool).unwrap(), "INT");
        assert_eq!(SqliteDialect.sql_type(&DataType::Json).unwrap(), "JSON");
    }

    #[test]
    fn test_unresolved_reference_is_internal_error() {
        let reference = DataType::Reference {
            entity_name: "Team".into(),
            field_name: String::new(),
        };
        let err = PostgresDialect.sql_type(&reference).unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
    }

    #[test]
    fn test_generated_pk_fragments() {
        assert_eq!(
            PostgresDialect.generated_pk_sql(&DataType::Int16),
            Some("SMALLSERIAL NOT NULL PRIMARY KEY")
        );
        assert_eq!(
            MySqlDialect.generated_pk_sql(&DataType::Int32),
            Some("INT NOT NULL PRIMARY KEY AUTO_INCREMENT")
        );
        assert_eq!(
            SqliteDialect.generated_pk_sql(&DataType::Int64),
            Some("INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL")
        );
        assert_eq!(PostgresDialect.generated_pk_sql(&DataType::Uuid), None);
    }

    #[test]
    fn test_dialect_capabilities() {
        assert_eq!(PostgresDialect.comment_style(), CommentStyle::Statement);
        assert_eq!(MySqlDialect.comment_style(), CommentStyle::Inline);
        assert_eq!(SqliteDialect.comment_style(), CommentStyle::Block);
        assert!(!MySqlDialect.inline_references());
        assert!(!MySqlDialect.index_if_not_exists());
        assert!(!SqliteDialect.supports_namespaces());
        assert_eq!(MySqlDialect.bool_literal(true), "1");
        assert_eq!(PostgresDialect.bool_literal(false), "FALSE");
    }
}
