//! # schemagen CLI
//!
//! Command-line interface for schemagen.
//!
//! ## Commands
//!
//! - `generate` - Generate the creation script for a model file
//! - `validate` - Validate a model file
//! - `info` - Display information about a model file
//!

pub mod commands;
pub mod config;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemagen_core::DatabaseType;
use std::path::PathBuf;

pub use commands::GenerateOptions;
pub use config::{CliConfig, DEFAULT_CONFIG_FILE};

// Re-export dependencies for use in main.rs
pub use schemagen_codegen;
pub use schemagen_core;
pub use schemagen_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "schemagen", version, about = "Dependency-ordered DDL synthesis from a data model")]
#[command(after_help = "EXAMPLES:
    schemagen generate model.json                     # Print a PostgreSQL script
    schemagen generate model.json -d mysql -o sql/    # Write a MySQL script into sql/
    schemagen validate model.json                     # Report model errors and warnings")]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the creation script for a model file
    Generate(GenerateArgs),
    /// Validate a model file
    Validate {
        /// Model file (JSON)
        model: PathBuf,
    },
    /// Show a summary of a model file
    Info {
        /// Model file (JSON)
        model: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Model file (JSON)
    pub model: PathBuf,

    /// Target database
    #[arg(short, long, value_enum)]
    pub database: Option<CliDatabase>,

    /// Emit plain CREATE statements without IF NOT EXISTS guards
    #[arg(long)]
    pub no_safe: bool,

    /// Config file (defaults to ./schemagen.toml when present)
    #[arg(short, long, env = "SCHEMAGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to write the script into instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliDatabase {
    #[value(alias = "pg", alias = "postgresql")]
    Postgres,
    Mysql,
    Sqlite,
}

impl From<CliDatabase> for DatabaseType {
    fn from(val: CliDatabase) -> Self {
        match val {
            CliDatabase::Postgres => DatabaseType::PostgreSQL,
            CliDatabase::Mysql => DatabaseType::MySQL,
            CliDatabase::Sqlite => DatabaseType::SQLite,
        }
    }
}

impl From<GenerateArgs> for GenerateOptions {
    fn from(args: GenerateArgs) -> Self {
        Self {
            model: args.model,
            database: args.database.map(Into::into),
            no_safe: args.no_safe,
            config: args.config,
            output: args.output,
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Run a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => commands::generate(&args.into()),
        Commands::Validate { model } => commands::validate(&model),
        Commands::Info { model } => commands::info(&model),
    }
}
