//! Field definitions for entity columns
//!
//! This module contains the `Field` struct and the `DefaultValue` enum used
//! to describe the columns of an entity.

use heck::ToSnakeCase;
use schemagen_core::{DataType, EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Field
// ============================================================================

/// Represents a field within an entity (maps to a database column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Logical field name
    pub name: String,

    /// Database column name (typically snake_case)
    #[serde(default)]
    pub column_name: String,

    /// Data type of the field
    pub data_type: DataType,

    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,

    /// Whether the field must be unique
    #[serde(default)]
    pub unique: bool,

    /// Whether to create a single-column index on this field
    #[serde(default)]
    pub indexed: bool,

    /// Whether this is the primary key
    #[serde(default)]
    pub is_primary_key: bool,

    /// Whether the database assigns the value (identity / auto-increment)
    #[serde(default)]
    pub generated: bool,

    /// Default value for the field
    #[serde(default)]
    pub default_value: Option<DefaultValue>,

    /// Human-readable description, emitted as a column comment
    #[serde(default)]
    pub description: Option<String>,
}

impl Field {
    /// Create a new field with the given name and data type
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        let name = name.into();
        let column_name = name.to_snake_case();

        Self {
            name,
            column_name,
            data_type,
            nullable: false,
            unique: false,
            indexed: false,
            is_primary_key: false,
            generated: false,
            default_value: None,
            description: None,
        }
    }

    /// Create a database-generated integer primary key named `id`
    pub fn primary_key() -> Self {
        Self::new("id", DataType::Int32).primary().generated()
    }

    /// Create a caller-assigned UUID primary key named `id`
    pub fn uuid_primary_key() -> Self {
        Self::new("id", DataType::Uuid).primary()
    }

    /// Create a created_at timestamp field filled in on insert
    pub fn created_at() -> Self {
        Self::new("created_at", DataType::DateTime).with_default(DefaultValue::AutoNowAdd)
    }

    /// Create an updated_at timestamp field maintained on every write
    pub fn updated_at() -> Self {
        Self::new("updated_at", DataType::DateTime).with_default(DefaultValue::AutoNow)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Allow NULL values
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the field as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field as indexed
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Mark the field as the primary key
    pub fn primary(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark the value as assigned by the database
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default_value = Some(default);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the column name (if different from field name)
    pub fn with_column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = column_name.into();
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Check if this field is the primary key
    pub fn is_pk(&self) -> bool {
        self.is_primary_key
    }

    /// Check if the primary key value comes from the database
    pub fn is_generated_pk(&self) -> bool {
        self.is_primary_key && self.generated
    }

    /// Check if this field holds a reference to another entity
    pub fn is_reference(&self) -> bool {
        self.data_type.is_reference()
    }

    /// Whether `name` addresses this field by logical or column name
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.column_name == name
    }
}

impl Validatable for Field {
    fn validate(&self) -> EngineResult<()> {
        if self.name.is_empty() {
            return Err(EngineError::validation("Field name cannot be empty"));
        }

        if !is_valid_identifier(&self.name) {
            return Err(EngineError::validation(format!(
                "Field name '{}' is not a valid identifier",
                self.name
            )));
        }

        if self.column_name.is_empty() {
            return Err(EngineError::validation("Column name cannot be empty"));
        }

        if self.generated && !self.is_primary_key {
            return Err(EngineError::validation(
                "Only the primary key can be generated by the database",
            ));
        }

        if self.is_generated_pk() && self.default_value.is_some() {
            return Err(EngineError::validation(
                "A generated primary key cannot carry a default",
            ));
        }

        if self.is_primary_key && self.nullable {
            return Err(EngineError::validation("A primary key cannot be nullable"));
        }

        if let DataType::Varchar(0) = self.data_type {
            return Err(EngineError::validation("String length must be positive"));
        }

        Ok(())
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new("field", DataType::String)
    }
}

// ============================================================================
// DefaultValue
// ============================================================================

/// Default values for fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DefaultValue {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Timestamp set when the row is inserted
    AutoNowAdd,
    /// Timestamp refreshed on every write (maintained outside the database)
    AutoNow,
    /// Value produced by a caller-side function, e.g. a token generator
    Callable(String),
    /// Raw SQL expression, emitted verbatim
    Expression(String),
}

impl DefaultValue {
    /// Whether the value is one of the timestamp markers
    pub fn is_timestamp_marker(&self) -> bool {
        matches!(self, DefaultValue::AutoNow | DefaultValue::AutoNowAdd)
    }

    /// Whether the value can only be produced outside the database
    pub fn is_callable(&self) -> bool {
        matches!(self, DefaultValue::Callable(_))
    }
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Null => write!(f, "null"),
            DefaultValue::Bool(b) => write!(f, "{}", b),
            DefaultValue::Int(i) => write!(f, "{}", i),
            DefaultValue::Float(v) => write!(f, "{}", v),
            DefaultValue::String(s) => write!(f, "{:?}", s),
            DefaultValue::AutoNowAdd => write!(f, "auto_now_add"),
            DefaultValue::AutoNow => write!(f, "auto_now"),
            DefaultValue::Callable(name) => write!(f, "{}()", name),
            DefaultValue::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a string is a valid identifier
pub(crate) fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    // First character must be letter or underscore
    if !first.is_alphabetic() && first != '_' {
        return false;
    }

    // Rest must be alphanumeric or underscore
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ============================================================================
// Tests
// ============================================================================
