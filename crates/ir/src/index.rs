//! Multi-column unique groups and index declarations

use schemagen_core::{EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// UniqueGroup
// ============================================================================

/// A set of fields whose combined values must be unique
///
/// Names may be logical field names or column names of the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueGroup {
    pub fields: Vec<String>,
}

impl UniqueGroup {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validatable for UniqueGroup {
    fn validate(&self) -> EngineResult<()> {
        if self.fields.is_empty() {
            return Err(EngineError::validation("Unique group cannot be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// IndexDef
// ============================================================================

/// A standalone index over one or more fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Explicit index name; derived from table and columns when absent
    #[serde(default)]
    pub name: Option<String>,

    /// Indexed fields, in index order
    pub fields: Vec<String>,

    /// Whether the index enforces uniqueness
    #[serde(default)]
    pub unique: bool,
}

impl IndexDef {
    /// Create an index over the given fields
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    /// Set an explicit index name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Make the index unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl Validatable for IndexDef {
    fn validate(&self) -> EngineResult<()> {
        if self.fields.is_empty() {
            return Err(EngineError::validation("Index must cover at least one field"));
        }
        if self.name.as_deref().is_some_and(str::is_empty) {
            return Err(EngineError::validation("Index name cannot be empty"));
        }
        Ok(())
    }
}
