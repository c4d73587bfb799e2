//! Command implementations

use anyhow::{Context, Result, bail};
use colored::*;
use schemagen_codegen::{Generator, summarize};
use schemagen_core::DatabaseType;
use schemagen_ir::{ModelGraph, Validator, load_model};
use std::path::{Path, PathBuf};

use crate::config::CliConfig;

fn read_model(path: &Path) -> Result<ModelGraph> {
    load_model(path).with_context(|| format!("failed to load model '{}'", path.display()))
}

// ============================================================================
// generate
// ============================================================================

/// Options of the `generate` command after argument parsing
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub model: PathBuf,
    pub database: Option<DatabaseType>,
    pub no_safe: bool,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Generate the creation script; print it, or write it into the output directory
pub fn generate(options: &GenerateOptions) -> Result<()> {
    let config = CliConfig::discover(options.config.as_deref(), ".")
        .context("failed to read configuration")?
        .with_overrides(options.database, options.no_safe, options.output.clone());

    let model = read_model(&options.model)?;
    let generator = Generator::new(config.generator_config());

    match &config.output_dir {
        Some(dir) => {
            let path = dir.join(config.script_filename(chrono::Local::now().date_naive()));
            let script = generator
                .generate_and_write(&model, &path)
                .with_context(|| format!("failed to generate schema for '{}'", model.meta.name))?;

            eprint!("{}", summarize(&script));
            eprintln!("{} {}", "✓ Wrote".green().bold(), path.display());
        }
        None => {
            let script = generator
                .generate(&model)
                .with_context(|| format!("failed to generate schema for '{}'", model.meta.name))?;
            println!("{}", script);
        }
    }

    Ok(())
}

// ============================================================================
// validate
// ============================================================================

/// Run every validation rule and report errors and warnings
pub fn validate(model_path: &Path) -> Result<()> {
    println!(
        "{} {}",
        "Validating model:".cyan().bold(),
        model_path.display().to_string().yellow()
    );

    let model = read_model(model_path)?;
    let report = Validator::with_default_rules().validate(&model);

    for error in &report.errors {
        println!("  {} {}", "✗".red().bold(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "!".yellow().bold(), warning);
    }

    if report.has_errors() {
        bail!("model has {} error(s)", report.errors.len());
    }

    println!(
        "{} ({} entities, {} warning(s))",
        "✓ Model is valid".green().bold(),
        model.entity_count(),
        report.warnings.len()
    );
    Ok(())
}

// ============================================================================
// info
// ============================================================================

/// Print a summary of the model's entities, relationships and namespaces
pub fn info(model_path: &Path) -> Result<()> {
    let model = read_model(model_path)?;

    println!("{} {}", "Model:".cyan().bold(), model.meta.name.bold());
    println!("  Version:       {}", model.meta.version);
    if let Some(description) = &model.meta.description {
        println!("  Description:   {}", description);
    }
    println!("  Entities:      {}", model.entity_count());
    println!("  Relationships: {}", model.relationship_count());

    let namespaces = model.namespaces();
    if !namespaces.is_empty() {
        println!("  Namespaces:    {}", namespaces.join(", "));
    }

    for entity in &model.entities {
        println!();
        println!(
            "{} {} ({} fields)",
            entity.name.green().bold(),
            entity.table_id().to_string().dimmed(),
            entity.field_count()
        );
        for relationship in &entity.relationships {
            println!(
                "  {} {} {}",
                relationship.name,
                relationship.arrow_symbol(),
                relationship.to_entity.yellow()
            );
        }
    }

    Ok(())
}
