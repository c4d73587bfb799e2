//! Entity definitions for data models
//!
//! This module contains the `Entity` struct: one table descriptor with its
//! columns, relationships, unique groups and indexes.

use crate::field::{Field, is_valid_identifier};
use crate::index::{IndexDef, UniqueGroup};
use crate::relationship::Relationship;
use crate::relationship_helpers::{add_fk_field_for_relationship, create_fk_field};
use heck::ToSnakeCase;
use schemagen_core::{EngineError, EngineResult, TableId, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Entity
// ============================================================================

/// Represents a data entity (maps to a database table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name (PascalCase, e.g., "Tournament", "BlogPost")
    pub name: String,

    /// Database table name (snake_case, e.g., "tournament", "blog_post")
    #[serde(default)]
    pub table_name: String,

    /// Owning namespace; `None` is the default namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// Human-readable description, emitted as a table comment
    #[serde(default)]
    pub description: Option<String>,

    /// Fields (columns) in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Relationships owned by this entity
    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Multi-column unique constraints
    #[serde(default)]
    pub unique_together: Vec<UniqueGroup>,

    /// Standalone indexes
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
}

impl Entity {
    /// Create a new entity with a generated integer primary key
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table_name = name.to_snake_case();

        Self {
            name,
            table_name,
            namespace: None,
            description: None,
            fields: vec![Field::primary_key()],
            relationships: Vec::new(),
            unique_together: Vec::new(),
            indexes: Vec::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the table name
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Place the entity in a namespace; an empty name means the default one
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the primary key
    pub fn with_primary_key(mut self, field: Field) -> Self {
        self.fields.retain(|f| !f.is_primary_key);
        self.fields.insert(0, field.primary());
        self
    }

    /// Add a field using builder pattern
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Attach a relationship, creating its owning column when not declared
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        if relationship.is_reference() && !self.has_field(&relationship.fk_field_name()) {
            self.fields.push(create_fk_field(&relationship));
        }
        self.relationships.push(relationship);
        self
    }

    /// Add a multi-column unique constraint
    pub fn with_unique_together<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_together.push(UniqueGroup::new(fields));
        self
    }

    /// Add a standalone index
    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Attach a relationship, failing if its column name is taken by a plain field
    pub fn add_relationship(&mut self, relationship: Relationship) -> EngineResult<()> {
        add_fk_field_for_relationship(self, &relationship)?;
        self.relationships.push(relationship);
        Ok(())
    }

    /// Fill in derived names and missing reference columns
    ///
    /// Used after loading hand-written model files, where table names,
    /// column names and owning columns are commonly left out.
    pub fn normalize(&mut self) -> EngineResult<()> {
        if self.table_name.is_empty() {
            self.table_name = self.name.to_snake_case();
        }
        if self.namespace.as_deref().is_some_and(str::is_empty) {
            self.namespace = None;
        }
        for field in &mut self.fields {
            if field.column_name.is_empty() {
                field.column_name = field.name.to_snake_case();
            }
        }
        for relationship in self.relationships.clone() {
            add_fk_field_for_relationship(self, &relationship)?;
        }
        Ok(())
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Qualified identity of the physical table
    pub fn table_id(&self) -> TableId {
        TableId::new(self.namespace.as_deref(), &self.table_name)
    }

    /// Get the primary key field
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_primary_key)
    }

    /// Get a field by logical name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a field by logical name, column name, or the name of the
    /// single-valued relationship that owns it
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.get_field_by_name(name)
            .or_else(|| self.fields.iter().find(|f| f.column_name == name))
            .or_else(|| self.relationship_field(name))
    }

    /// Owning column of the reference relationship called `name`
    fn relationship_field(&self, name: &str) -> Option<&Field> {
        let relationship = self
            .relationships
            .iter()
            .filter(|r| r.is_reference())
            .find(|r| r.name == name)?;
        let fk = relationship.fk_field_name();
        self.fields.iter().find(|f| f.answers_to(&fk))
    }

    /// Resolve a field by logical or column name, failing on unknown names
    pub fn resolve_field(&self, name: &str) -> EngineResult<&Field> {
        self.find_field(name)
            .ok_or_else(|| EngineError::unknown_column(&self.name, name))
    }

    /// Resolve the referenced field of a relationship on this (target) entity
    pub fn referenced_field(&self, to_field: Option<&str>) -> EngineResult<&Field> {
        match to_field {
            Some(name) => self.resolve_field(name),
            None => self.primary_key().ok_or_else(|| {
                EngineError::entity_validation(&self.name, "Entity must have a primary key")
            }),
        }
    }

    /// Relationship owning the given field, if any
    pub fn relationship_for_field(&self, field: &Field) -> Option<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.is_reference())
            .find(|r| field.answers_to(&r.fk_field_name()))
    }

    /// Get all many-to-many relationships
    pub fn many_to_many(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| r.is_many_to_many())
    }

    /// Get all indexed fields (primary keys are indexed implicitly)
    pub fn indexed_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.indexed && !f.is_primary_key)
            .collect()
    }

    /// Check if entity has a specific field name
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Get the number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Validatable for Entity {
    fn validate(&self) -> EngineResult<()> {
        if self.name.is_empty() {
            return Err(EngineError::entity_validation(
                &self.name,
                "Entity name cannot be empty",
            ));
        }

        if !is_valid_identifier(&self.name) {
            return Err(EngineError::entity_validation(
                &self.name,
                format!("Entity name '{}' is not a valid identifier", self.name),
            ));
        }

        if self.table_name.is_empty() {
            return Err(EngineError::entity_validation(
                &self.name,
                "Table name cannot be empty",
            ));
        }

        match self.fields.iter().filter(|f| f.is_primary_key).count() {
            0 => {
                return Err(EngineError::entity_validation(
                    &self.name,
                    "Entity must have a primary key",
                ));
            }
            1 => {}
            _ => {
                return Err(EngineError::entity_validation(
                    &self.name,
                    "Composite primary keys are not supported",
                ));
            }
        }

        for field in &self.fields {
            field.validate().map_err(|e| {
                EngineError::field_validation(&self.name, &field.name, e.to_string())
            })?;
        }

        let mut field_names = HashSet::new();
        let mut column_names = HashSet::new();
        for field in &self.fields {
            if !field_names.insert(&field.name) {
                return Err(EngineError::field_validation(
                    &self.name,
                    &field.name,
                    "Duplicate field name",
                ));
            }
            if !column_names.insert(&field.column_name) {
                return Err(EngineError::field_validation(
                    &self.name,
                    &field.name,
                    format!("Duplicate column name '{}'", field.column_name),
                ));
            }
        }

        for relationship in &self.relationships {
            relationship.validate()?;
            if relationship.is_reference() {
                let fk_name = relationship.fk_field_name();
                match self.get_field_by_name(&fk_name) {
                    Some(field) if field.is_reference() => {}
                    Some(_) => {
                        return Err(EngineError::field_validation(
                            &self.name,
                            &fk_name,
                            format!(
                                "Field cannot hold relationship '{}'",
                                relationship.name
                            ),
                        ));
                    }
                    None => return Err(EngineError::unknown_column(&self.name, fk_name)),
                }
            }
        }

        for group in &self.unique_together {
            group.validate().map_err(|e| {
                EngineError::entity_validation(&self.name, e.to_string())
            })?;
            for name in &group.fields {
                self.resolve_field(name)?;
            }
        }

        for index in &self.indexes {
            index.validate().map_err(|e| {
                EngineError::entity_validation(&self.name, e.to_string())
            })?;
            for name in &index.fields {
                self.resolve_field(name)?;
            }
        }

        Ok(())
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new("Entity")
    }
}

// ============================================================================
// Tests
// ============================================================================
