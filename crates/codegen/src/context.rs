//! # Generation Context
//!
//! The `GenerationContext` holds everything the DDL components share during a
//! single generation run:
//!
//! - The model being generated and the generator configuration
//! - The selected [`Dialect`]
//! - Namespaces discovered so far, in first-discovery order
//! - Column type resolution (references take the type of the column they point at)
//! - Quoting and escaping helpers
//!
//! A context is created per call to [`Generator::generate`](crate::Generator::generate)
//! and dropped when the call returns, so nothing leaks between runs.

use schemagen_core::{DataType, EngineError, EngineResult, TableId};
use schemagen_ir::{Entity, Field, ModelGraph};

use crate::GeneratorConfig;
use crate::dialect::{CommentStyle, Dialect, dialect_for};

/// Reference chains longer than this are treated as a model error
const MAX_REFERENCE_DEPTH: usize = 16;

// ============================================================================
// GenerationContext
// ============================================================================

/// Per-run state shared by the DDL components
#[derive(Debug)]
pub struct GenerationContext<'a> {
    model: &'a ModelGraph,
    config: &'a GeneratorConfig,
    dialect: Box<dyn Dialect>,
    namespaces: Vec<String>,
}

impl<'a> GenerationContext<'a> {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Build a context for one generation run
    pub fn new(model: &'a ModelGraph, config: &'a GeneratorConfig) -> Self {
        Self {
            model,
            config,
            dialect: dialect_for(config.database),
            namespaces: Vec::new(),
        }
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// The model being generated
    pub fn model(&self) -> &'a ModelGraph {
        self.model
    }

    /// Generator configuration for this run
    pub fn config(&self) -> &GeneratorConfig {
        self.config
    }

    /// Active dialect
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Namespaces discovered so far, in first-discovery order
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Look up a declared entity by logical name
    pub fn require_entity(&self, name: &str) -> EngineResult<&'a Entity> {
        self.model.require_entity(name)
    }

    // ====================================================================
    // Namespaces
    // ====================================================================

    /// Record a namespace used by a table.
    ///
    /// The default namespace (`None`) is never recorded. Fails when the
    /// dialect cannot place tables in named namespaces.
    pub fn discover_namespace(&mut self, namespace: Option<&str>) -> EngineResult<()> {
        let Some(ns) = namespace.filter(|ns| !ns.is_empty()) else {
            return Ok(());
        };

        if !self.dialect.supports_namespaces() {
            return Err(EngineError::unsupported_feature(
                self.config.database.display_name(),
                format!("namespace \"{}\"", ns),
            ));
        }

        if !self.namespaces.iter().any(|known| known == ns) {
            self.namespaces.push(ns.to_string());
        }
        Ok(())
    }

    // ====================================================================
    // Rendering helpers
    // ====================================================================

    /// `IF NOT EXISTS ` guard for schema and table creation
    pub fn if_not_exists(&self) -> &'static str {
        if self.config.safe { "IF NOT EXISTS " } else { "" }
    }

    /// `IF NOT EXISTS ` guard for index creation, where the dialect allows it
    pub fn index_if_not_exists(&self) -> &'static str {
        if self.config.safe && self.dialect.index_if_not_exists() {
            "IF NOT EXISTS "
        } else {
            ""
        }
    }

    /// Quote an identifier
    pub fn quote(&self, ident: &str) -> String {
        self.dialect.quote(ident)
    }

    /// Quote a comma-separated column list
    pub fn quote_list<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|c| self.quote(c.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Qualified, quoted table name
    pub fn table_sql(&self, table: &TableId) -> String {
        self.dialect.table_name(table)
    }

    /// Qualified, quoted table name of an entity
    pub fn entity_table_sql(&self, entity: &Entity) -> String {
        self.table_sql(&entity.table_id())
    }

    /// Escape free text for embedding in a comment
    pub fn escape_comment(&self, text: &str) -> String {
        let escaped = escape_literal(text);
        match self.dialect.comment_style() {
            CommentStyle::Block => escaped.replace("*/", "* /"),
            CommentStyle::Statement | CommentStyle::Inline => escaped,
        }
    }

    // ====================================================================
    // Type resolution
    // ====================================================================

    /// SQL type of a column.
    ///
    /// Reference columns take the type of the column they point at, following
    /// chains of references. A generated primary key contributes its plain type.
    pub fn column_type(&self, field: &Field) -> EngineResult<String> {
        let concrete = self.resolve_type(&field.data_type)?;
        self.dialect.sql_type(concrete)
    }

    /// SQL type of an entity's primary key column
    pub fn primary_key_type(&self, entity: &Entity) -> EngineResult<String> {
        let pk = entity.referenced_field(None)?;
        self.column_type(pk)
    }

    fn resolve_type<'t>(&'t self, data_type: &'t DataType) -> EngineResult<&'t DataType> {
        let mut current = data_type;

        for _ in 0..MAX_REFERENCE_DEPTH {
            let DataType::Reference {
                entity_name,
                field_name,
            } = current
            else {
                return Ok(current);
            };

            let target = self.require_entity(entity_name)?;
            let to_field = Some(field_name.as_str()).filter(|f| !f.is_empty());
            current = &target.referenced_field(to_field)?.data_type;
        }

        Err(EngineError::validation(format!(
            "reference chain starting at {} is too deep",
            data_type.display_name()
        )))
    }
}

/// Double single quotes for embedding in a SQL string literal
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_core::DatabaseType;
    use schemagen_ir::Relationship;

    fn model() -> ModelGraph {
        ModelGraph::new("Ctx")
            .with_entity(Entity::new("Tournament").in_namespace("test_schema"))
            .with_entity(
                Entity::new("Category")
                    .with_primary_key(Field::new("slug", DataType::Varchar(64))),
            )
            .with_entity(
                Entity::new("Event")
                    .with_relationship(Relationship::foreign_key("tournament", "Tournament"))
                    .with_relationship(Relationship::foreign_key("category", "Category")),
            )
    }

    #[test]
    fn test_reference_takes_target_pk_type() {
        let model = model();
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);
        let event = model.get_entity("Event").unwrap();

        let tournament_id = event.get_field_by_name("tournament_id").unwrap();
        assert_eq!(ctx.column_type(tournament_id).unwrap(), "INT");

        let category_id = event.get_field_by_name("category_id").unwrap();
        assert_eq!(ctx.column_type(category_id).unwrap(), "VARCHAR(64)");
    }

    #[test]
    fn test_reference_to_unknown_entity() {
        let model = ModelGraph::new("Broken").with_entity(
            Entity::new("Event").with_relationship(Relationship::foreign_key("ghost", "Ghost")),
        );
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);
        let field = model.entities[0].get_field_by_name("ghost_id").unwrap();

        assert!(matches!(
            ctx.column_type(field),
            Err(EngineError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_namespace_discovery_order() {
        let model = model();
        let config = GeneratorConfig::default();
        let mut ctx = GenerationContext::new(&model, &config);

        ctx.discover_namespace(Some("league")).unwrap();
        ctx.discover_namespace(None).unwrap();
        ctx.discover_namespace(Some("archive")).unwrap();
        ctx.discover_namespace(Some("league")).unwrap();
        ctx.discover_namespace(Some("")).unwrap();

        assert_eq!(ctx.namespaces(), ["league", "archive"]);
    }

    #[test]
    fn test_namespace_rejected_without_support() {
        let model = model();
        let config = GeneratorConfig::new().with_database(DatabaseType::SQLite);
        let mut ctx = GenerationContext::new(&model, &config);

        assert!(ctx.discover_namespace(None).is_ok());
        let err = ctx.discover_namespace(Some("league")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFeature { .. }));
    }

    #[test]
    fn test_if_not_exists_toggle() {
        let model = model();
        let safe = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &safe);
        assert_eq!(ctx.if_not_exists(), "IF NOT EXISTS ");

        let unsafe_create = GeneratorConfig::new().unsafe_create();
        let ctx = GenerationContext::new(&model, &unsafe_create);
        assert_eq!(ctx.if_not_exists(), "");
        assert_eq!(ctx.index_if_not_exists(), "");

        let mysql = GeneratorConfig::new().with_database(DatabaseType::MySQL);
        let ctx = GenerationContext::new(&model, &mysql);
        assert_eq!(ctx.if_not_exists(), "IF NOT EXISTS ");
        assert_eq!(ctx.index_if_not_exists(), "");
    }

    #[test]
    fn test_escape_comment() {
        let model = model();
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);
        assert_eq!(ctx.escape_comment("What's up"), "What''s up");

        let sqlite = GeneratorConfig::new().with_database(DatabaseType::SQLite);
        let ctx = GenerationContext::new(&model, &sqlite);
        assert_eq!(ctx.escape_comment("a */ b"), "a * / b");
    }

    #[test]
    fn test_table_sql_and_quote_list() {
        let model = model();
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::new(&model, &config);
        let tournament = model.get_entity("Tournament").unwrap();

        assert_eq!(
            ctx.entity_table_sql(tournament),
            "\"test_schema\".\"tournament\""
        );
        assert_eq!(ctx.quote_list(&["a", "b"]), "\"a\", \"b\"");
    }
}
