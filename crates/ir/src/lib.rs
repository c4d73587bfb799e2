//! # schemagen IR (Intermediate Representation)
//!
//! This crate is the model-definition facility for schemagen. It holds
//! everything a caller declares before DDL generation begins.
//!
//! ## Core Concepts
//!
//! - **Entity**: a table descriptor (e.g., Tournament, Event)
//! - **Field**: a column of an entity (e.g., name, created)
//! - **Relationship**: a reference or many-to-many link owned by an entity
//! - **IndexDef / UniqueGroup**: multi-column indexes and unique constraints
//! - **ModelGraph**: the ordered root container handed to the generator
//!

// Module declarations
pub mod entity;
pub mod field;
pub mod index;
pub mod model;
pub mod relationship;
pub mod relationship_helpers;
pub mod serialization;
pub mod validation;

// Re-export commonly used types at crate root
pub use entity::Entity;
pub use field::{DefaultValue, Field};
pub use index::{IndexDef, UniqueGroup};
pub use model::{ModelGraph, ModelMeta};
pub use relationship::Relationship;
pub use relationship_helpers::{
    add_fk_field_for_relationship, create_fk_field, generate_fk_field_name,
    generate_junction_table_name,
};
pub use serialization::{ModelFile, load_model, load_model_from_string, save_model};
pub use validation::{ValidationResult, ValidationRule, Validator};

// Re-export core types that are commonly used with IR
pub use schemagen_core::{
    DataType, DatabaseType, EngineError, EngineResult, ReferentialAction, RelationType, TableId,
    Validatable,
};

/// Current schema version for model files
pub const SCHEMA_VERSION: u32 = 1;

/// File extension for model files
pub const MODEL_FILE_EXTENSION: &str = "json";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        // Re-exported from core
        DataType,
        DatabaseType,
        // Core types
        DefaultValue,
        EngineError,
        EngineResult,
        Entity,
        Field,
        IndexDef,
        ModelGraph,
        ReferentialAction,
        RelationType,
        Relationship,
        TableId,
        UniqueGroup,
        Validatable,
    };
}

// ============================================================================
// Tests
// ============================================================================
