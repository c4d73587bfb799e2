//! # schemagen Core
//!
//! Core types, traits, and error handling for schemagen.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: column data types, target databases, referential actions,
//!   qualified table identities
//! - **Traits**: `Validatable` and `Persistable`
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use traits::{Persistable, Validatable};
pub use types::{DataType, DatabaseType, ReferentialAction, RelationType, TableId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
