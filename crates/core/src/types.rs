//! Core types used throughout schemagen
//!
//! This module contains the value types shared by the model definition
//! layer and the DDL engine: column data types, target databases,
//! referential actions and qualified table identities.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Data Types
// ============================================================================

/// Data types supported for entity fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params")]
pub enum DataType {
    // Primitive Types
    /// Variable-length string with the conventional 255 limit
    String,
    /// Variable-length string with an explicit maximum length
    Varchar(u32),
    /// Long-form text content (TEXT/CLOB)
    Text,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point (double precision)
    Float64,
    /// Fixed-point decimal
    Decimal { max_digits: u32, decimal_places: u32 },
    /// Boolean true/false
    Bool,
    /// UUID (universally unique identifier)
    Uuid,
    /// Date and time with timezone
    DateTime,
    /// Date without time
    Date,
    /// Time without date
    Time,
    /// Elapsed time, stored as microseconds
    Duration,
    /// Binary data (BYTEA/BLOB)
    Bytes,
    /// JSON/JSONB data
    Json,

    // Complex Types
    /// Array/list of items
    Array(Box<DataType>),

    // Reference Types
    /// Foreign key reference to another entity; the column takes the SQL
    /// type of the referenced column
    Reference {
        entity_name: String,
        field_name: String,
    },

    // Enum Type
    /// Enumeration with named variants, stored as text
    Enum { name: String, variants: Vec<String> },
}

impl DataType {
    /// Check if this type is a reference to another entity
    pub fn is_reference(&self) -> bool {
        matches!(self, DataType::Reference { .. })
    }

    /// Check if this type is an integer type
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int16 | DataType::Int32 | DataType::Int64)
    }

    /// Whether a literal `DEFAULT` can be inlined for a column of this type.
    ///
    /// Large text, structured and identity-like values get their defaults
    /// applied by the caller layer instead.
    pub fn inlines_default(&self) -> bool {
        !matches!(
            self,
            DataType::Text | DataType::Json | DataType::Uuid | DataType::Array(_)
        )
    }

    /// Get a user-friendly display name
    pub fn display_name(&self) -> String {
        match self {
            DataType::String => "String".to_string(),
            DataType::Varchar(n) => format!("String({})", n),
            DataType::Text => "Text".to_string(),
            DataType::Int16 => "Small Integer".to_string(),
            DataType::Int32 => "Integer".to_string(),
            DataType::Int64 => "Big Integer".to_string(),
            DataType::Float32 => "Float".to_string(),
            DataType::Float64 => "Double".to_string(),
            DataType::Decimal {
                max_digits,
                decimal_places,
            } => format!("Decimal({}, {})", max_digits, decimal_places),
            DataType::Bool => "Boolean".to_string(),
            DataType::Uuid => "UUID".to_string(),
            DataType::DateTime => "DateTime".to_string(),
            DataType::Date => "Date".to_string(),
            DataType::Time => "Time".to_string(),
            DataType::Duration => "Duration".to_string(),
            DataType::Bytes => "Binary".to_string(),
            DataType::Json => "JSON".to_string(),
            DataType::Array(inner) => format!("[{}]", inner.display_name()),
            DataType::Reference { entity_name, .. } => format!("Ref<{}>", entity_name),
            DataType::Enum { name, .. } => format!("Enum<{}>", name),
        }
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::String
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Database Types
// ============================================================================

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    #[serde(alias = "postgres", alias = "pg")]
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::MySQL => "MySQL",
            DatabaseType::SQLite => "SQLite",
        }
    }

    /// Get all database types
    pub fn all() -> &'static [DatabaseType] {
        &[
            DatabaseType::PostgreSQL,
            DatabaseType::MySQL,
            DatabaseType::SQLite,
        ]
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(DatabaseType::PostgreSQL),
            "mysql" => Ok(DatabaseType::MySQL),
            "sqlite" => Ok(DatabaseType::SQLite),
            other => Err(format!(
                "unknown database '{}', expected one of: postgres, mysql, sqlite",
                other
            )),
        }
    }
}

// ============================================================================
// Relationship Types
// ============================================================================

/// Entity relationship types, seen from the owning side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Owning column references exactly one record and is unique
    OneToOne,
    /// Many owning records reference one record
    ManyToOne,
    /// Many-to-many through a join table; an empty name means the
    /// conventional `<owner_table>_<target>` name
    ManyToMany {
        #[serde(default)]
        junction_table: String,
    },
}

impl RelationType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "One to One",
            RelationType::ManyToOne => "Many to One",
            RelationType::ManyToMany { .. } => "Many to Many",
        }
    }

    /// Get arrow symbol for textual summaries
    pub fn arrow_symbol(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "1 ─── 1",
            RelationType::ManyToOne => "* >─── 1",
            RelationType::ManyToMany { .. } => "* >──< *",
        }
    }

    /// Check if this relationship requires a junction table
    pub fn requires_junction_table(&self) -> bool {
        matches!(self, RelationType::ManyToMany { .. })
    }
}

impl Default for RelationType {
    fn default() -> Self {
        RelationType::ManyToOne
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Referential Actions
// ============================================================================

/// Actions for foreign key constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    /// Delete related records when parent is deleted
    #[default]
    Cascade,
    /// Set foreign key to NULL when parent is deleted
    SetNull,
    /// Prevent deletion if related records exist
    Restrict,
    /// Do nothing (database default)
    NoAction,
    /// Set to default value
    SetDefault,
}

impl ReferentialAction {
    /// Get SQL keyword
    pub fn to_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

// ============================================================================
// Table Identity
// ============================================================================

/// A physical table qualified by its namespace.
///
/// `namespace == None` is the default namespace, which is never created
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId {
    pub namespace: Option<String>,
    pub table: String,
}

impl TableId {
    /// Create a table identity, treating an empty namespace as the default one
    pub fn new(namespace: Option<&str>, table: impl Into<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            table: table.into(),
        }
    }

    /// Table in the default namespace
    pub fn unqualified(table: impl Into<String>) -> Self {
        Self {
            namespace: None,
            table: table.into(),
        }
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
