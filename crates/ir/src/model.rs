//! Model graph definitions
//!
//! This module contains `ModelGraph`, the root container handed to the DDL
//! generator: an ordered list of entities plus descriptive metadata.

use crate::Entity;
use schemagen_core::{DataType, EngineError, EngineResult, TableId, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ============================================================================
// ModelGraph
// ============================================================================

/// Root container for a data model
///
/// Entity order is declaration order. The generator uses it as the tie-break
/// for table ordering, so reordering entities reorders the output script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGraph {
    /// Model metadata
    pub meta: ModelMeta,

    /// All entities, in declaration order
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl ModelGraph {
    /// Create a new, empty model with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: ModelMeta::new(name),
            entities: Vec::new(),
        }
    }

    // ========================================================================
    // Entity Management
    // ========================================================================

    /// Add an entity to the end of the declaration order
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Add an entity using builder pattern
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.add_entity(entity);
        self
    }

    /// Get an entity by logical name
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Get a mutable entity by logical name
    pub fn get_entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    /// Get an entity by logical name, failing when it is not declared
    pub fn require_entity(&self, name: &str) -> EngineResult<&Entity> {
        self.get_entity(name)
            .ok_or_else(|| EngineError::EntityNotFound(name.to_string()))
    }

    /// Find the declared entity that owns a qualified table
    pub fn entity_by_table(&self, table: &TableId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.table_id() == *table)
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get the number of relationships across all entities
    pub fn relationship_count(&self) -> usize {
        self.entities.iter().map(|e| e.relationships.len()).sum()
    }

    /// Check if the model has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Distinct non-default namespaces in first-discovery order
    pub fn namespaces(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entities
            .iter()
            .filter_map(|e| e.namespace.as_deref())
            .filter(|ns| seen.insert(*ns))
            .collect()
    }

    /// Fill in derived names and missing reference columns on every entity
    pub fn normalize(&mut self) -> EngineResult<()> {
        for entity in &mut self.entities {
            entity.normalize()?;
        }
        Ok(())
    }
}

impl Validatable for ModelGraph {
    fn validate(&self) -> EngineResult<()> {
        self.meta.validate()?;

        for entity in &self.entities {
            entity.validate()?;
        }

        let mut names = HashSet::new();
        let mut tables = HashSet::new();
        for entity in &self.entities {
            if !names.insert(entity.name.as_str()) {
                return Err(EngineError::entity_validation(
                    &entity.name,
                    "Duplicate entity name",
                ));
            }
            let table = entity.table_id();
            if !tables.insert(table.clone()) {
                return Err(EngineError::DuplicateTable(table.to_string()));
            }
        }

        // Owner of each join table, keyed by its qualified identity
        let mut join_tables: HashMap<TableId, &str> = HashMap::new();

        for entity in &self.entities {
            for field in &entity.fields {
                if let DataType::Reference { entity_name, .. } = &field.data_type {
                    self.require_entity(entity_name)?;
                }
            }

            for relationship in &entity.relationships {
                let target = self.require_entity(&relationship.to_entity)?;
                target.referenced_field(relationship.target_field())?;

                if relationship.is_many_to_many() {
                    let join = TableId::new(
                        entity.namespace.as_deref(),
                        relationship.junction_table_for(entity),
                    );
                    if relationship.backward_key_for(entity) == relationship.forward_key_name() {
                        return Err(EngineError::RelationshipValidation(format!(
                            "Join table '{}' uses the same column for both sides",
                            join
                        )));
                    }
                    if let Some(owner) = join_tables.insert(join.clone(), &entity.name) {
                        return Err(EngineError::DuplicateJoinTable(format!(
                            "{} (declared by {} and {})",
                            join, owner, entity.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for ModelGraph {
    fn default() -> Self {
        Self::new("Untitled Model")
    }
}

// ============================================================================
// ModelMeta
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Model name
    pub name: String,

    /// Model description
    #[serde(default)]
    pub description: Option<String>,

    /// Model version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl ModelMeta {
    /// Create new metadata with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: default_version(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

impl Validatable for ModelMeta {
    fn validate(&self) -> EngineResult<()> {
        if self.name.is_empty() {
            return Err(EngineError::validation("Model name cannot be empty"));
        }
        if self.name.len() > 100 {
            return Err(EngineError::validation(
                "Model name too long (max 100 characters)",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
