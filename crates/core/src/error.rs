//! Error types for schemagen
//!
//! This module provides unified error handling across the engine: model
//! errors detected while rendering, dependency-ordering failures, the
//! recoverable unsupported-default signal, and the IO/serialization errors
//! raised around model files.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for schemagen
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Model Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity validation failed
    #[error("Entity validation failed for '{entity}': {message}")]
    EntityValidation { entity: String, message: String },

    /// Field validation failed
    #[error("Field validation failed for '{entity}.{field}': {message}")]
    FieldValidation {
        entity: String,
        field: String,
        message: String,
    },

    /// Relationship validation failed
    #[error("Relationship validation failed: {0}")]
    RelationshipValidation(String),

    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// An index, unique group or relationship names a column the entity lacks
    #[error("Column '{column}' not found in entity '{entity}'")]
    UnknownColumn { entity: String, column: String },

    /// Two entities claim the same physical table in one namespace
    #[error("Duplicate table: '{0}' is declared by more than one entity")]
    DuplicateTable(String),

    /// Two many-to-many links share a join table
    #[error("Duplicate join table: '{0}' is declared by more than one many-to-many relationship")]
    DuplicateJoinTable(String),

    /// The selected dialect cannot express part of the model
    #[error("{dialect} does not support {feature}")]
    UnsupportedFeature { dialect: String, feature: String },

    // ========================================================================
    // Ordering Errors
    // ========================================================================
    /// No table can be placed next: the constrained foreign keys form a cycle
    #[error(
        "Can't create schema due to cyclic fk references; unplaced tables: {}",
        .tables.join(", ")
    )]
    CyclicDependency { tables: Vec<String> },

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    /// A default value cannot be written as a SQL literal
    #[error("Default for column '{column}' cannot be rendered: {reason}")]
    UnsupportedDefault { column: String, reason: String },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid model file format
    #[error("Invalid model file format: {0}")]
    InvalidModelFormat(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create an entity validation error
    pub fn entity_validation(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::EntityValidation {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a field validation error
    pub fn field_validation(
        entity: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        EngineError::FieldValidation {
            entity: entity.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown-column error
    pub fn unknown_column(entity: impl Into<String>, column: impl Into<String>) -> Self {
        EngineError::UnknownColumn {
            entity: entity.into(),
            column: column.into(),
        }
    }

    /// Create an unsupported-default error
    pub fn unsupported_default(column: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::UnsupportedDefault {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported-feature error
    pub fn unsupported_feature(dialect: impl Into<String>, feature: impl Into<String>) -> Self {
        EngineError::UnsupportedFeature {
            dialect: dialect.into(),
            feature: feature.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::EntityValidation { .. }
                | EngineError::FieldValidation { .. }
                | EngineError::RelationshipValidation(_)
        )
    }

    /// Check if this error describes a malformed model
    pub fn is_model_error(&self) -> bool {
        self.is_validation()
            || matches!(
                self,
                EngineError::EntityNotFound(_)
                    | EngineError::UnknownColumn { .. }
                    | EngineError::DuplicateTable(_)
                    | EngineError::DuplicateJoinTable(_)
                    | EngineError::UnsupportedFeature { .. }
            )
    }

    /// Check if this error is a foreign-key cycle
    pub fn is_cyclic(&self) -> bool {
        matches!(self, EngineError::CyclicDependency { .. })
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_) | EngineError::FileRead { .. } | EngineError::FileWrite { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = EngineError::validation("Name is required");
        assert!(err.is_validation());
        assert!(err.is_model_error());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_field_validation_error() {
        let err = EngineError::field_validation("Event", "id", "Generated key cannot have a default");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'Event.id': Generated key cannot have a default"
        );
    }

    #[test]
    fn test_unknown_column_is_model_error() {
        let err = EngineError::unknown_column("Team", "nickname");
        assert!(err.is_model_error());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Column 'nickname' not found in entity 'Team'");
    }

    #[test]
    fn test_cyclic_dependency_lists_tables() {
        let err = EngineError::CyclicDependency {
            tables: vec!["a".to_string(), "b".to_string()],
        };
        assert!(err.is_cyclic());
        assert!(!err.is_model_error());
        assert_eq!(
            err.to_string(),
            "Can't create schema due to cyclic fk references; unplaced tables: a, b"
        );
    }

    #[test]
    fn test_unsupported_default() {
        let err = EngineError::unsupported_default("token", "callable default");
        assert!(!err.is_model_error());
        assert_eq!(
            err.to_string(),
            "Default for column 'token' cannot be rendered: callable default"
        );
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngineError = io_err.into();
        assert!(err.is_io());
    }
}
