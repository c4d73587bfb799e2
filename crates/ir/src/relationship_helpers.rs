//! Relationship Helper Functions
//!
//! This module provides helper functions for managing relationships between entities,
//! including automatic foreign key field generation.
//!
//! ## FK Auto-Generation
//!
//! When a relationship is attached to its owning entity, the owning column is
//! added unless the entity already declares it:
//!
//! - **One-to-One**: FK on the owning entity, marked unique
//! - **Many-to-One**: FK on the owning entity
//! - **Many-to-Many**: no column; a join table is synthesized at generation time

use crate::entity::Entity;
use crate::field::Field;
use crate::relationship::Relationship;
use heck::ToSnakeCase;
use schemagen_core::{DataType, EngineError, EngineResult};

// ============================================================================
// Name Generation
// ============================================================================

/// Generate a foreign key field name from a relation or entity name
///
/// Converts the name to snake_case and appends "_id"
///
/// # Examples
///
/// - "tournament" -> "tournament_id"
/// - "BlogPost" -> "blog_post_id"
pub fn generate_fk_field_name(name: &str) -> String {
    format!("{}_id", name.to_snake_case())
}

/// Generate a junction table name for many-to-many relationships
///
/// The owner's physical table comes first, followed by the snake_case target.
///
/// # Examples
///
/// - ("event", "Team") -> "event_team"
/// - ("blog_post", "Tag") -> "blog_post_tag"
pub fn generate_junction_table_name(owner_table: &str, target_entity: &str) -> String {
    format!("{}_{}", owner_table, target_entity.to_snake_case())
}

// ============================================================================
// FK Field Creation
// ============================================================================

/// Create the owning column for a single-valued relationship
///
/// The column references the target entity and takes its type from the
/// referenced field at generation time.
pub fn create_fk_field(relationship: &Relationship) -> Field {
    let mut field = Field::new(
        relationship.fk_field_name(),
        DataType::Reference {
            entity_name: relationship.to_entity.clone(),
            field_name: relationship.to_field.clone(),
        },
    );
    field.nullable = !relationship.required;
    field.unique = relationship.is_one_to_one();
    field.description = relationship.description.clone();

    field
}

/// Add the owning column for `relationship` to `entity`
///
/// Returns `Ok(false)` when the entity already declares a reference field
/// with that name, and an error when the name is taken by a plain column.
pub fn add_fk_field_for_relationship(
    entity: &mut Entity,
    relationship: &Relationship,
) -> EngineResult<bool> {
    if relationship.is_many_to_many() {
        return Ok(false);
    }

    let fk_name = relationship.fk_field_name();
    if let Some(existing) = entity.get_field_by_name(&fk_name) {
        if existing.is_reference() {
            return Ok(false);
        }
        return Err(EngineError::field_validation(
            &entity.name,
            &fk_name,
            format!(
                "Field already exists and cannot hold relationship '{}'",
                relationship.name
            ),
        ));
    }

    entity.fields.push(create_fk_field(relationship));
    Ok(true)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_fk_field_name() {
        assert_eq!(generate_fk_field_name("tournament"), "tournament_id");
        assert_eq!(generate_fk_field_name("BlogPost"), "blog_post_id");
    }

    #[test]
    fn test_generate_junction_table_name() {
        assert_eq!(generate_junction_table_name("event", "Team"), "event_team");
        assert_eq!(
            generate_junction_table_name("blog_post", "SearchTag"),
            "blog_post_search_tag"
        );
    }

    #[test]
    fn test_create_fk_field() {
        let rel = Relationship::one_to_one("profile", "Profile")
            .optional()
            .with_description("Linked profile");
        let field = create_fk_field(&rel);

        assert_eq!(field.name, "profile_id");
        assert!(field.nullable);
        assert!(field.unique);
        assert_eq!(field.description.as_deref(), Some("Linked profile"));
        assert_eq!(
            field.data_type,
            DataType::Reference {
                entity_name: "Profile".into(),
                field_name: String::new(),
            }
        );
    }

    #[test]
    fn test_add_fk_field_for_relationship() {
        let mut entity = Entity::new("Event");
        let rel = Relationship::foreign_key("tournament", "Tournament");

        assert!(add_fk_field_for_relationship(&mut entity, &rel).unwrap());
        assert!(entity.has_field("tournament_id"));

        // Second attach reuses the existing column
        assert!(!add_fk_field_for_relationship(&mut entity, &rel).unwrap());
        assert_eq!(
            entity
                .fields
                .iter()
                .filter(|f| f.name == "tournament_id")
                .count(),
            1
        );
    }

    #[test]
    fn test_add_fk_field_conflicts_with_plain_column() {
        let mut entity =
            Entity::new("Event").with_field(Field::new("tournament_id", DataType::Int32));
        let rel = Relationship::foreign_key("tournament", "Tournament");

        let err = add_fk_field_for_relationship(&mut entity, &rel).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_many_to_many_adds_no_column() {
        let mut entity = Entity::new("Event");
        let before = entity.fields.len();
        let rel = Relationship::many_to_many("participants", "Team");

        assert!(!add_fk_field_for_relationship(&mut entity, &rel).unwrap());
        assert_eq!(entity.fields.len(), before);
    }
}
