//! # DDL Generator Orchestrator
//!
//! The `Generator` is the top-level entry point for script generation. It
//! takes a [`ModelGraph`] and a [`GeneratorConfig`], builds a
//! [`GenerationContext`], and runs the DDL components to produce a
//! [`GeneratedScript`].
//!
//! ## Pipeline
//!
//! ```text
//! ModelGraph + GeneratorConfig
//!         │
//!         ▼
//!   validate (fatal on errors, warnings logged)
//!         │
//!         ▼
//!   GenerationContext::new()
//!         │
//!         ├──► assemble_table()  per entity → TableUnit
//!         ├──► order_units()                → dependency order
//!         ├──► compose_script()             → SQL text
//!         │
//!         ▼
//!   GeneratedScript { sql, tables, join_tables, namespaces, warnings }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemagen_codegen::{Generator, GeneratorConfig};
//! use schemagen_ir::ModelGraph;
//!
//! let model = ModelGraph::new("tournaments");
//! let script = Generator::new(GeneratorConfig::default()).generate(&model)?;
//!
//! println!("{}", script.sql());
//! ```

use schemagen_core::{EngineResult, Validatable};
use schemagen_ir::{ModelGraph, Validator};
use std::path::Path;

use crate::context::GenerationContext;
use crate::ddl::{assemble_table, compose_script, order_units};
use crate::{GeneratedScript, GeneratorConfig};

// ============================================================================
// Generator
// ============================================================================

/// Top-level DDL generator.
///
/// The `Generator` is stateless aside from its configuration; every call to
/// [`generate`](Generator::generate) builds fresh accumulators, so one
/// generator can be shared and reused.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: GeneratorConfig) {
        self.config = config;
    }

    // ====================================================================
    // Generation
    // ====================================================================

    /// Produce the creation script for a model.
    ///
    /// # Steps
    ///
    /// 1. **Validate** the model. Errors abort generation; warnings are
    ///    logged and carried into the output.
    /// 2. **Assemble** one table unit per entity, discovering namespaces in
    ///    declaration order.
    /// 3. **Order** the units so every table follows the tables it references.
    /// 4. **Compose** namespaces, tables and join tables into one script.
    ///
    /// # Errors
    ///
    /// Model errors (unknown columns, duplicate tables, unsupported dialect
    /// features, …) and foreign-key cycles. No partial script is returned.
    pub fn generate(&self, model: &ModelGraph) -> EngineResult<GeneratedScript> {
        // ── 1. Validate ──────────────────────────────────────────────────
        model.validate()?;

        let report = Validator::with_default_rules().validate(model);
        let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
        for warning in &warnings {
            tracing::warn!(model = %model.meta.name, "{}", warning);
        }
        report.to_result()?;

        // ── 2. Assemble ──────────────────────────────────────────────────
        let mut ctx = GenerationContext::new(model, &self.config);
        let mut units = Vec::with_capacity(model.entity_count());
        for entity in &model.entities {
            ctx.discover_namespace(entity.namespace.as_deref())?;
            units.push(assemble_table(&ctx, entity)?);
        }

        // ── 3. Order ─────────────────────────────────────────────────────
        let ordered = order_units(units)?;

        // ── 4. Compose ───────────────────────────────────────────────────
        let sql = compose_script(&ctx, &ordered);

        let script = GeneratedScript {
            model_name: model.meta.name.clone(),
            database: self.config.database,
            namespaces: ctx.namespaces().to_vec(),
            tables: ordered.iter().map(|unit| unit.id.clone()).collect(),
            join_tables: ordered
                .iter()
                .flat_map(|unit| unit.join_tables.iter().map(|join| join.id.clone()))
                .collect(),
            sql,
            warnings,
        };

        tracing::info!(
            tables = script.tables.len(),
            join_tables = script.join_tables.len(),
            namespaces = script.namespaces.len(),
            dialect = %self.config.database,
            model = %script.model_name,
            "schema generation complete",
        );

        Ok(script)
    }

    // ====================================================================
    // Convenience: generate and write to disk
    // ====================================================================

    /// Generate the script and write it to `path`, creating parent
    /// directories as needed.
    pub fn generate_and_write(
        &self,
        model: &ModelGraph,
        path: impl AsRef<Path>,
    ) -> EngineResult<GeneratedScript> {
        let path = path.as_ref();
        let script = self.generate(model)?;
        script.write_to(path)?;
        tracing::info!(
            path = %path.display(),
            bytes = script.sql.len(),
            "script written to disk",
        );
        Ok(script)
    }
}

// ============================================================================
// Standalone convenience function
// ============================================================================

/// Generate a creation script using the default configuration.
///
/// This is a shorthand for `Generator::with_defaults().generate(model)`.
pub fn generate(model: &ModelGraph) -> EngineResult<GeneratedScript> {
    Generator::with_defaults().generate(model)
}

// ============================================================================
// GenerationSummary: human-readable report
// ============================================================================

/// A human-readable summary of a completed generation run.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Model name.
    pub model_name: String,
    /// Target database.
    pub database: String,
    /// Number of namespaces created.
    pub namespaces: usize,
    /// Number of entity tables.
    pub tables: usize,
    /// Number of synthesized join tables.
    pub join_tables: usize,
    /// Number of statements in the script.
    pub statements: usize,
    /// Number of validation warnings.
    pub warning_count: usize,
    /// Script size in bytes.
    pub total_bytes: usize,
}

impl GenerationSummary {
    /// Build a summary from a generated script.
    pub fn from_script(script: &GeneratedScript) -> Self {
        Self {
            model_name: script.model_name.clone(),
            database: script.database.to_string(),
            namespaces: script.namespaces.len(),
            tables: script.tables.len(),
            join_tables: script.join_tables.len(),
            statements: script.statement_count(),
            warning_count: script.warnings.len(),
            total_bytes: script.sql.len(),
        }
    }

    /// Format the summary as a human-readable string.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(512);

        out.push_str("╔══════════════════════════════════════════════════╗\n");
        out.push_str("║         Schema Generation Complete               ║\n");
        out.push_str("╠══════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Model:       {:<35}║\n", self.model_name));
        out.push_str(&format!("║  Database:    {:<35}║\n", self.database));
        out.push_str(&format!("║  Namespaces:  {:<35}║\n", self.namespaces));
        out.push_str(&format!("║  Tables:      {:<35}║\n", self.tables));
        out.push_str(&format!("║  Join tables: {:<35}║\n", self.join_tables));
        out.push_str(&format!("║  Statements:  {:<35}║\n", self.statements));
        out.push_str(&format!("║  Warnings:    {:<35}║\n", self.warning_count));

        let size_str = if self.total_bytes < 1024 {
            format!("{} B", self.total_bytes)
        } else {
            format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
        };
        out.push_str(&format!("║  Size:        {:<35}║\n", size_str));
        out.push_str("╚══════════════════════════════════════════════════╝\n");

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Produce a [`GenerationSummary`] from a [`GeneratedScript`].
pub fn summarize(script: &GeneratedScript) -> GenerationSummary {
    GenerationSummary::from_script(script)
}

// ============================================================================
// Tests
// ============================================================================
