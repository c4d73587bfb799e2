//! Validation rules and utilities for schemagen models
//!
//! This module collects every problem in a model at once (unlike
//! `Validatable`, which stops at the first error) so the CLI can report
//! them together with non-fatal warnings.

use crate::field::is_valid_identifier;
use crate::{DefaultValue, ModelGraph};
use schemagen_core::{EngineError, EngineResult, TableId};
use std::collections::{HashMap, HashSet};

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a failed validation result with an error
    pub fn error(error: ValidationError) -> Self {
        Self {
            valid: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to EngineResult (fails if any errors)
    pub fn to_result(self) -> EngineResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(EngineError::validation(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g., "entities.Event.fields.token")
    pub path: Option<String>,

    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    /// Add a path to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a suggestion to the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

// ============================================================================
// ValidationErrorCode
// ============================================================================

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    // Entity errors
    EmptyEntityName,
    InvalidEntityName,
    DuplicateEntityName,
    EmptyTableName,
    DuplicateTable,
    NoPrimaryKey,
    CompositePrimaryKey,

    // Field errors
    EmptyFieldName,
    InvalidFieldName,
    DuplicateFieldName,
    DuplicateColumnName,
    GeneratedNonPrimaryKey,
    GeneratedKeyWithDefault,

    // Relationship errors
    OrphanRelationship,
    UnknownTargetField,
    MissingReferenceColumn,
    DuplicateJoinTable,
    InvalidRelationship,

    // Index errors
    EmptyIndex,
    UnknownIndexColumn,

    // Model errors
    EmptyModelName,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A validation warning (non-fatal issue)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Warning code
    pub code: ValidationWarningCode,

    /// Human-readable warning message
    pub message: String,

    /// Path to the element
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Create a new warning
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Add a path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] Warning: {}", path, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

// ============================================================================
// ValidationWarningCode
// ============================================================================

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationWarningCode {
    NoDescription,
    DefaultNotRendered,
    LogicalOnlyRelationship,
    DuplicateIndex,
    EmptyModel,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait for validation rules
pub trait ValidationRule {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Validate a model and return the result
    fn validate(&self, model: &ModelGraph) -> ValidationResult;
}

// ============================================================================
// Validator
// ============================================================================

/// Model validator that runs multiple validation rules
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with default rules
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(ModelMetaRule));
        validator.add_rule(Box::new(EntityNamesRule));
        validator.add_rule(Box::new(EntityFieldsRule));
        validator.add_rule(Box::new(RelationshipsRule));
        validator.add_rule(Box::new(IndexesRule));
        validator
    }

    /// Add a validation rule
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate a model with all rules
    pub fn validate(&self, model: &ModelGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for rule in &self.rules {
            let rule_result = rule.validate(model);
            result.merge(rule_result);
        }

        result
    }

    /// Validate and return Result
    pub fn validate_result(&self, model: &ModelGraph) -> EngineResult<()> {
        self.validate(model).to_result()
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

/// Rule: Validate model metadata
pub struct ModelMetaRule;

impl ValidationRule for ModelMetaRule {
    fn name(&self) -> &'static str {
        "model_meta"
    }

    fn description(&self) -> &'static str {
        "Validates model metadata"
    }

    fn validate(&self, model: &ModelGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if model.meta.name.is_empty() {
            result.add_error(ValidationError::new(
                ValidationErrorCode::EmptyModelName,
                "Model name cannot be empty",
            ));
        }

        if model.is_empty() {
            result.add_warning(ValidationWarning::new(
                ValidationWarningCode::EmptyModel,
                "Model has no entities; the generated script will be empty",
            ));
        }

        result
    }
}

/// Rule: Validate entity and table names
pub struct EntityNamesRule;

impl ValidationRule for EntityNamesRule {
    fn name(&self) -> &'static str {
        "entity_names"
    }

    fn description(&self) -> &'static str {
        "Validates that entity names are valid and tables unique per namespace"
    }

    fn validate(&self, model: &ModelGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_tables: HashSet<TableId> = HashSet::new();

        for (position, entity) in model.entities.iter().enumerate() {
            if entity.name.is_empty() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::EmptyEntityName,
                        "Entity name cannot be empty",
                    )
                    .with_path(format!("entities[{}]", position)),
                );
                continue;
            }

            let entity_path = format!("entities.{}", entity.name);

            if !is_valid_identifier(&entity.name) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidEntityName,
                        format!("Entity name '{}' is not a valid identifier", entity.name),
                    )
                    .with_path(&entity_path)
                    .with_suggestion("Use PascalCase with only letters and numbers"),
                );
            }

            if !seen_names.insert(&entity.name) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateEntityName,
                        format!("Duplicate entity name: '{}'", entity.name),
                    )
                    .with_path(&entity_path),
                );
            }

            if entity.table_name.is_empty() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::EmptyTableName,
                        format!("Entity '{}' has no table name", entity.name),
                    )
                    .with_path(&entity_path),
                );
                continue;
            }

            let table = entity.table_id();
            if !seen_tables.insert(table.clone()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateTable,
                        format!("Table '{}' is declared more than once", table),
                    )
                    .with_path(&entity_path)
                    .with_suggestion("Rename the table or move it to another namespace"),
                );
            }

            if entity.description.is_none() {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::NoDescription,
                        format!("Entity '{}' has no description", entity.name),
                    )
                    .with_path(&entity_path),
                );
            }
        }

        result
    }
}

/// Rule: Validate entity fields
pub struct EntityFieldsRule;

impl ValidationRule for EntityFieldsRule {
    fn name(&self) -> &'static str {
        "entity_fields"
    }

    fn description(&self) -> &'static str {
        "Validates fields, primary keys and defaults"
    }

    fn validate(&self, model: &ModelGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for entity in &model.entities {
            let entity_path = format!("entities.{}", entity.name);

            match entity.fields.iter().filter(|f| f.is_primary_key).count() {
                0 => result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::NoPrimaryKey,
                        format!("Entity '{}' has no primary key", entity.name),
                    )
                    .with_path(&entity_path)
                    .with_suggestion("Add a field with is_primary_key = true"),
                ),
                1 => {}
                _ => result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::CompositePrimaryKey,
                        format!("Entity '{}' has more than one primary key", entity.name),
                    )
                    .with_path(&entity_path)
                    .with_suggestion("Use a unique_together group instead"),
                ),
            }

            let mut seen_fields: HashSet<&str> = HashSet::new();
            let mut seen_columns: HashSet<&str> = HashSet::new();
            for field in &entity.fields {
                let field_path = format!("{}.fields.{}", entity_path, field.name);

                if field.name.is_empty() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::EmptyFieldName,
                            "Field name cannot be empty",
                        )
                        .with_path(&field_path),
                    );
                    continue;
                }

                if !is_valid_identifier(&field.name) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::InvalidFieldName,
                            format!("Field name '{}' is not a valid identifier", field.name),
                        )
                        .with_path(&field_path),
                    );
                }

                if !seen_fields.insert(&field.name) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DuplicateFieldName,
                            format!("Duplicate field name: '{}'", field.name),
                        )
                        .with_path(&field_path),
                    );
                }

                if !seen_columns.insert(&field.column_name) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DuplicateColumnName,
                            format!("Duplicate column name: '{}'", field.column_name),
                        )
                        .with_path(&field_path),
                    );
                }

                if field.generated && !field.is_primary_key {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::GeneratedNonPrimaryKey,
                            format!("Field '{}' is generated but not the primary key", field.name),
                        )
                        .with_path(&field_path),
                    );
                }

                if field.is_generated_pk() && field.default_value.is_some() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::GeneratedKeyWithDefault,
                            format!("Generated primary key '{}' carries a default", field.name),
                        )
                        .with_path(&field_path)
                        .with_suggestion("Remove the default; the database assigns the value"),
                    );
                }

                let unrendered = match &field.default_value {
                    Some(DefaultValue::Callable(name)) => {
                        Some(format!("default {}() is applied by the caller", name))
                    }
                    Some(DefaultValue::AutoNow) => {
                        Some("auto_now is maintained on write, not by a DDL default".to_string())
                    }
                    Some(_) if !field.data_type.inlines_default() => Some(format!(
                        "{} columns do not inline their default",
                        field.data_type.display_name()
                    )),
                    _ => None,
                };
                if let Some(reason) = unrendered {
                    result.add_warning(
                        ValidationWarning::new(
                            ValidationWarningCode::DefaultNotRendered,
                            format!("Field '{}': {}", field.name, reason),
                        )
                        .with_path(&field_path),
                    );
                }
            }
        }

        result
    }
}

/// Rule: Validate relationships
pub struct RelationshipsRule;

impl ValidationRule for RelationshipsRule {
    fn name(&self) -> &'static str {
        "relationships"
    }

    fn description(&self) -> &'static str {
        "Validates that relationships reference existing entities and columns"
    }

    fn validate(&self, model: &ModelGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut join_tables: HashMap<TableId, &str> = HashMap::new();

        for entity in &model.entities {
            for relationship in &entity.relationships {
                let rel_path = format!("entities.{}.relationships.{}", entity.name, relationship.name);

                if let Err(e) = schemagen_core::Validatable::validate(relationship) {
                    result.add_error(
                        ValidationError::new(ValidationErrorCode::InvalidRelationship, e.to_string())
                            .with_path(&rel_path),
                    );
                }

                match model.get_entity(&relationship.to_entity) {
                    None => result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::OrphanRelationship,
                            format!(
                                "Relationship '{}' references non-existent entity '{}'",
                                relationship.name, relationship.to_entity
                            ),
                        )
                        .with_path(&rel_path),
                    ),
                    Some(target) => {
                        if target.referenced_field(relationship.target_field()).is_err() {
                            result.add_error(
                                ValidationError::new(
                                    ValidationErrorCode::UnknownTargetField,
                                    format!(
                                        "Relationship '{}' references a missing field on '{}'",
                                        relationship.name, target.name
                                    ),
                                )
                                .with_path(&rel_path),
                            );
                        }
                    }
                }

                if relationship.is_reference() {
                    let fk_name = relationship.fk_field_name();
                    if !entity.get_field_by_name(&fk_name).is_some_and(|f| f.is_reference()) {
                        result.add_error(
                            ValidationError::new(
                                ValidationErrorCode::MissingReferenceColumn,
                                format!(
                                    "Relationship '{}' has no reference column '{}'",
                                    relationship.name, fk_name
                                ),
                            )
                            .with_path(&rel_path),
                        );
                    }

                    if !relationship.db_constraint {
                        result.add_warning(
                            ValidationWarning::new(
                                ValidationWarningCode::LogicalOnlyRelationship,
                                format!(
                                    "Relationship '{}' emits no foreign key constraint",
                                    relationship.name
                                ),
                            )
                            .with_path(&rel_path),
                        );
                    }
                } else {
                    let join = TableId::new(
                        entity.namespace.as_deref(),
                        relationship.junction_table_for(entity),
                    );
                    if let Some(owner) = join_tables.insert(join.clone(), &entity.name) {
                        result.add_error(
                            ValidationError::new(
                                ValidationErrorCode::DuplicateJoinTable,
                                format!(
                                    "Join table '{}' is already declared by '{}'",
                                    join, owner
                                ),
                            )
                            .with_path(&rel_path),
                        );
                    }
                }
            }
        }

        result
    }
}

/// Rule: Validate unique groups and indexes
pub struct IndexesRule;

impl ValidationRule for IndexesRule {
    fn name(&self) -> &'static str {
        "indexes"
    }

    fn description(&self) -> &'static str {
        "Validates that unique groups and indexes name existing columns"
    }

    fn validate(&self, model: &ModelGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for entity in &model.entities {
            let entity_path = format!("entities.{}", entity.name);
            let groups = entity
                .unique_together
                .iter()
                .map(|g| ("unique_together", &g.fields));
            let indexes = entity.indexes.iter().map(|i| ("indexes", &i.fields));
            let mut seen: HashSet<&[String]> = HashSet::new();

            for (kind, fields) in groups.chain(indexes) {
                let path = format!("{}.{}", entity_path, kind);

                if fields.is_empty() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::EmptyIndex,
                            format!("Entity '{}' declares an empty {} entry", entity.name, kind),
                        )
                        .with_path(&path),
                    );
                    continue;
                }

                for name in fields {
                    if entity.find_field(name).is_none() {
                        result.add_error(
                            ValidationError::new(
                                ValidationErrorCode::UnknownIndexColumn,
                                format!("Unknown column '{}' on '{}'", name, entity.name),
                            )
                            .with_path(&path),
                        );
                    }
                }

                if kind == "indexes" && !seen.insert(fields.as_slice()) {
                    result.add_warning(
                        ValidationWarning::new(
                            ValidationWarningCode::DuplicateIndex,
                            format!(
                                "Index on ({}) is declared twice and will be emitted once",
                                fields.join(", ")
                            ),
                        )
                        .with_path(&path),
                    );
                }
            }
        }

        result
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, Field, IndexDef, Relationship};
    use schemagen_core::DataType;

    fn has_error(result: &ValidationResult, code: ValidationErrorCode) -> bool {
        result.errors.iter().any(|e| e.code == code)
    }

    #[test]
    fn test_validation_result_merge() {
        let mut result1 = ValidationResult::ok();
        let result2 = ValidationResult::error(ValidationError::new(
            ValidationErrorCode::EmptyEntityName,
            "Error",
        ));

        result1.merge(result2);
        assert!(!result1.valid);
        assert!(result1.has_errors());
        assert!(result1.to_result().is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::new(ValidationErrorCode::EmptyEntityName, "Name is empty")
            .with_path("entities.Event");
        assert_eq!(error.to_string(), "[entities.Event] Name is empty");

        let warning = ValidationWarning::new(ValidationWarningCode::NoDescription, "Bare");
        assert_eq!(warning.to_string(), "Warning: Bare");
    }

    #[test]
    fn test_validator_with_valid_model() {
        let model = ModelGraph::new("Tournaments")
            .with_entity(Entity::new("Tournament").with_description("Tournaments"))
            .with_entity(
                Entity::new("Event")
                    .with_description("Events")
                    .with_relationship(Relationship::foreign_key("tournament", "Tournament")),
            );

        let validator = Validator::with_default_rules();
        let result = validator.validate(&model);

        assert!(result.valid, "{:?}", result.errors);
        assert!(!result.has_warnings());
        assert_eq!(
            validator.rule_names(),
            vec!["model_meta", "entity_names", "entity_fields", "relationships", "indexes"]
        );
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut broken = Entity::new("Event")
            .with_field(Field::new("counter", DataType::Int32).generated())
            .with_index(IndexDef::new(["missing"]))
            .with_relationship(Relationship::foreign_key("venue", "Venue"));
        broken.fields[0].default_value = Some(DefaultValue::Int(1));
        let model = ModelGraph::new("Broken").with_entity(broken);

        let result = Validator::with_default_rules().validate(&model);
        assert!(has_error(&result, ValidationErrorCode::GeneratedNonPrimaryKey));
        assert!(has_error(&result, ValidationErrorCode::GeneratedKeyWithDefault));
        assert!(has_error(&result, ValidationErrorCode::UnknownIndexColumn));
        assert!(has_error(&result, ValidationErrorCode::OrphanRelationship));
    }

    #[test]
    fn test_entity_names_rule() {
        let mut nameless = Entity::new("Team");
        nameless.name = String::new();
        let model = ModelGraph::new("Test")
            .with_entity(nameless)
            .with_entity(Entity::new("Team"))
            .with_entity(Entity::new("Squad").with_table_name("team"));

        let result = EntityNamesRule.validate(&model);
        assert!(has_error(&result, ValidationErrorCode::EmptyEntityName));
        assert!(has_error(&result, ValidationErrorCode::DuplicateTable));
    }

    #[test]
    fn test_default_warnings() {
        let model = ModelGraph::new("Test").with_entity(
            Entity::new("Event")
                .with_field(
                    Field::new("token", DataType::Varchar(100))
                        .with_default(DefaultValue::Callable("generate_token".into())),
                )
                .with_field(Field::new("notes", DataType::Text).with_default(DefaultValue::String(
                    "n/a".into(),
                ))),
        );

        let result = EntityFieldsRule.validate(&model);
        assert!(result.valid);
        assert_eq!(
            result
                .warnings
                .iter()
                .filter(|w| w.code == ValidationWarningCode::DefaultNotRendered)
                .count(),
            2
        );
    }

    #[test]
    fn test_relationships_rule() {
        let model = ModelGraph::new("Test")
            .with_entity(Entity::new("Team"))
            .with_entity(
                Entity::new("Event")
                    .with_relationship(Relationship::foreign_key("team", "Team").without_constraint())
                    .with_relationship(Relationship::many_to_many("teams", "Team").through("links"))
                    .with_relationship(
                        Relationship::many_to_many("rivals", "Team")
                            .through("links")
                            .with_forward_key("rival_id"),
                    ),
            );

        let result = RelationshipsRule.validate(&model);
        assert!(has_error(&result, ValidationErrorCode::DuplicateJoinTable));
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.code == ValidationWarningCode::LogicalOnlyRelationship)
        );
    }

    #[test]
    fn test_duplicate_index_warning() {
        let model = ModelGraph::new("Test").with_entity(
            Entity::new("Team")
                .with_field(Field::new("alias", DataType::Int32))
                .with_index(IndexDef::new(["alias"]))
                .with_index(IndexDef::new(["alias"])),
        );

        let result = IndexesRule.validate(&model);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_indexes_accept_relationship_names() {
        let model = ModelGraph::new("Test")
            .with_entity(Entity::new("Tournament"))
            .with_entity(
                Entity::new("Event")
                    .with_field(Field::new("name", DataType::Text))
                    .with_relationship(Relationship::foreign_key("tournament", "Tournament"))
                    .with_unique_together(["name", "tournament"])
                    .with_index(IndexDef::new(["tournament"])),
            );

        let result = IndexesRule.validate(&model);
        assert!(result.valid, "{:?}", result.errors);
    }
}
