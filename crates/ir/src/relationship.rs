//! Relationship definitions between entities
//!
//! A `Relationship` is declared on its owning entity. Single-valued
//! references (`OneToOne`, `ManyToOne`) own a column on that entity;
//! many-to-many links own a join table.

use crate::entity::Entity;
use crate::relationship_helpers::{generate_fk_field_name, generate_junction_table_name};
use heck::ToSnakeCase;
use schemagen_core::{EngineError, EngineResult, ReferentialAction, RelationType, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Relationship
// ============================================================================

/// Represents a relationship from the owning entity to another entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relation name on the owning entity (e.g., "tournament", "participants")
    pub name: String,

    /// Logical name of the referenced entity
    pub to_entity: String,

    /// Type of relationship
    #[serde(default)]
    pub relation_type: RelationType,

    /// Field on the owning entity holding the reference (references only).
    /// Empty means `<name>_id`.
    #[serde(default)]
    pub from_field: String,

    /// Referenced field on the target entity. Empty means its primary key.
    #[serde(default)]
    pub to_field: String,

    /// Referential action on delete
    #[serde(default)]
    pub on_delete: ReferentialAction,

    /// Whether a database-level foreign key constraint is emitted
    #[serde(default = "default_true")]
    pub db_constraint: bool,

    /// Whether the reference column is NOT NULL
    #[serde(default = "default_true")]
    pub required: bool,

    /// Join-table column pointing back at the owner (many-to-many only)
    #[serde(default)]
    pub backward_key: String,

    /// Join-table column pointing at the target (many-to-many only)
    #[serde(default)]
    pub forward_key: String,

    /// Whether the join table gets a unique index over both keys
    #[serde(default)]
    pub unique_pairs: bool,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Relationship {
    /// Create a new relationship to the named entity
    pub fn new(
        name: impl Into<String>,
        to_entity: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            name: name.into(),
            to_entity: to_entity.into(),
            relation_type,
            from_field: String::new(),
            to_field: String::new(),
            on_delete: ReferentialAction::Cascade,
            db_constraint: true,
            required: true,
            backward_key: String::new(),
            forward_key: String::new(),
            unique_pairs: false,
            description: None,
        }
    }

    /// Create a many-to-one reference
    pub fn foreign_key(name: impl Into<String>, to_entity: impl Into<String>) -> Self {
        Self::new(name, to_entity, RelationType::ManyToOne)
    }

    /// Create a one-to-one reference (the owning column is unique)
    pub fn one_to_one(name: impl Into<String>, to_entity: impl Into<String>) -> Self {
        Self::new(name, to_entity, RelationType::OneToOne)
    }

    /// Create a many-to-many link with a conventionally named join table
    pub fn many_to_many(name: impl Into<String>, to_entity: impl Into<String>) -> Self {
        Self::new(
            name,
            to_entity,
            RelationType::ManyToMany {
                junction_table: String::new(),
            },
        )
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the owning field name
    pub fn with_from_field(mut self, field: impl Into<String>) -> Self {
        self.from_field = field.into();
        self
    }

    /// Set the referenced field name
    pub fn with_to_field(mut self, field: impl Into<String>) -> Self {
        self.to_field = field.into();
        self
    }

    /// Set the join table name (many-to-many only)
    pub fn through(mut self, table: impl Into<String>) -> Self {
        if let RelationType::ManyToMany { junction_table } = &mut self.relation_type {
            *junction_table = table.into();
        }
        self
    }

    /// Set the on delete action
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Keep the relation logical only: no constraint, no ordering edge
    pub fn without_constraint(mut self) -> Self {
        self.db_constraint = false;
        self
    }

    /// Mark as optional (NULL reference allowed)
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the join-table column pointing at the owner
    pub fn with_backward_key(mut self, key: impl Into<String>) -> Self {
        self.backward_key = key.into();
        self
    }

    /// Set the join-table column pointing at the target
    pub fn with_forward_key(mut self, key: impl Into<String>) -> Self {
        self.forward_key = key.into();
        self
    }

    /// Add a unique index over the join pair
    pub fn unique_pairs(mut self) -> Self {
        self.unique_pairs = true;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Check if this is a one-to-one relationship
    pub fn is_one_to_one(&self) -> bool {
        matches!(self.relation_type, RelationType::OneToOne)
    }

    /// Check if this is a many-to-many relationship
    pub fn is_many_to_many(&self) -> bool {
        self.relation_type.requires_junction_table()
    }

    /// Check if this relationship owns a column on its entity
    pub fn is_reference(&self) -> bool {
        !self.is_many_to_many()
    }

    /// Name of the owning field
    pub fn fk_field_name(&self) -> String {
        if self.from_field.is_empty() {
            generate_fk_field_name(&self.name)
        } else {
            self.from_field.clone()
        }
    }

    /// Explicit referenced field, `None` when the target primary key is meant
    pub fn target_field(&self) -> Option<&str> {
        Some(self.to_field.as_str()).filter(|f| !f.is_empty())
    }

    /// Explicitly declared join table name (if many-to-many)
    pub fn junction_table(&self) -> Option<&str> {
        match &self.relation_type {
            RelationType::ManyToMany { junction_table } if !junction_table.is_empty() => {
                Some(junction_table)
            }
            _ => None,
        }
    }

    /// Physical join table name, falling back to `<owner_table>_<target>`
    pub fn junction_table_for(&self, owner: &Entity) -> String {
        self.junction_table()
            .map(str::to_string)
            .unwrap_or_else(|| generate_junction_table_name(&owner.table_name, &self.to_entity))
    }

    /// Join-table column referencing the owner.
    ///
    /// Defaults to `<owner_table>_id`, or `<owner_table>_rel_id` when that
    /// would collide with the forward key (self-referential relations).
    pub fn backward_key_for(&self, owner: &Entity) -> String {
        if !self.backward_key.is_empty() {
            return self.backward_key.clone();
        }

        let key = format!("{}_id", owner.table_name);
        if key == self.forward_key_name() {
            format!("{}_rel_id", owner.table_name)
        } else {
            key
        }
    }

    /// Join-table column referencing the target
    pub fn forward_key_name(&self) -> String {
        if self.forward_key.is_empty() {
            format!("{}_id", self.to_entity.to_snake_case())
        } else {
            self.forward_key.clone()
        }
    }

    /// Get the arrow symbol for textual summaries
    pub fn arrow_symbol(&self) -> &'static str {
        self.relation_type.arrow_symbol()
    }
}

impl Validatable for Relationship {
    fn validate(&self) -> EngineResult<()> {
        if self.name.is_empty() {
            return Err(EngineError::RelationshipValidation(
                "Relationship name cannot be empty".to_string(),
            ));
        }

        if self.to_entity.is_empty() {
            return Err(EngineError::RelationshipValidation(format!(
                "Relationship '{}' has no target entity",
                self.name
            )));
        }

        if self.on_delete == ReferentialAction::SetNull && self.required && self.is_reference() {
            return Err(EngineError::RelationshipValidation(format!(
                "Relationship '{}' uses SET NULL on delete but is required",
                self.name
            )));
        }

        if self.is_many_to_many() {
            if !self.from_field.is_empty() {
                return Err(EngineError::RelationshipValidation(format!(
                    "Many-to-many relationship '{}' cannot own a column",
                    self.name
                )));
            }
        } else if !self.backward_key.is_empty()
            || !self.forward_key.is_empty()
            || self.unique_pairs
        {
            return Err(EngineError::RelationshipValidation(format!(
                "Join table options on '{}' require a many-to-many relationship",
                self.name
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
