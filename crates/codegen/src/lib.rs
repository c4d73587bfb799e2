//! # schemagen Codegen
//!
//! DDL generation engine for schemagen.
//!
//! This crate turns a [`ModelGraph`](schemagen_ir::ModelGraph) into a
//! dependency-ordered creation script.
//!
//! ## Features
//!
//! - **Column rendering**: types, nullability, uniqueness, literal defaults
//! - **Constraints & indexes**: unique groups, indexes, stable hashed names
//! - **References**: foreign keys and synthesized many-to-many join tables
//! - **Ordering**: tables follow the tables they reference; cycles are errors
//! - **Dialects**: PostgreSQL, MySQL and SQLite
//!

// ============================================================================
// Modules
// ============================================================================

pub mod context;
pub mod ddl;
pub mod dialect;
pub mod generator;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::GenerationContext;
pub use ddl::{JoinTable, TableUnit};
pub use dialect::{
    CommentStyle, Dialect, MySqlDialect, PostgresDialect, SqliteDialect, dialect_for,
};
pub use generator::{GenerationSummary, Generator, generate, summarize};

use schemagen_core::{DatabaseType, EngineError, EngineResult, TableId};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the DDL generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Target database dialect
    pub database: DatabaseType,

    /// Guard every creation statement with `IF NOT EXISTS`
    pub safe: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            database: DatabaseType::PostgreSQL,
            safe: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target database
    pub fn with_database(mut self, database: DatabaseType) -> Self {
        self.database = database;
        self
    }

    /// Emit plain `CREATE` statements that fail if the object exists
    pub fn unsafe_create(mut self) -> Self {
        self.safe = false;
        self
    }
}

// ============================================================================
// GeneratedScript
// ============================================================================

/// Output of one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// Name of the model the script was generated from
    pub model_name: String,

    /// Target database
    pub database: DatabaseType,

    /// Created namespaces, in creation order
    pub namespaces: Vec<String>,

    /// Entity tables, in creation order
    pub tables: Vec<TableId>,

    /// Synthesized join tables, in creation order
    pub join_tables: Vec<TableId>,

    /// The script
    pub sql: String,

    /// Validation warnings raised while generating
    pub warnings: Vec<String>,
}

impl GeneratedScript {
    /// The script text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Physical names of the entity tables, in creation order
    pub fn table_order(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table.as_str()).collect()
    }

    /// Number of statements in the script
    pub fn statement_count(&self) -> usize {
        self.sql.lines().filter(|line| line.ends_with(';')).count()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Write the script to a file, creating parent directories
    pub fn write_to(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::FileWrite {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }

        std::fs::write(path, format!("{}\n", self.sql)).map_err(|e| EngineError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Display for GeneratedScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

// ============================================================================
// Tests
// ============================================================================
