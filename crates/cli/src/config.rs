//! CLI configuration file (`schemagen.toml`)
//!
//! ```toml
//! database = "postgres"
//! safe = true
//! output_dir = "migrations"
//! file_prefix = "create_schema"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use chrono::NaiveDate;
use schemagen_codegen::GeneratorConfig;
use schemagen_core::{DatabaseType, EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "schemagen.toml";

/// Settings for the `generate` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Target database
    pub database: DatabaseType,

    /// Guard creation statements with `IF NOT EXISTS`
    pub safe: bool,

    /// Directory to write the script into; stdout when absent
    pub output_dir: Option<PathBuf>,

    /// Name part of the script file, after the date prefix
    pub file_prefix: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database: DatabaseType::PostgreSQL,
            safe: true,
            output_dir: None,
            file_prefix: "create_schema".to_string(),
        }
    }
}

impl CliConfig {
    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> EngineResult<Self> {
        toml::from_str(content).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Load the given file, or `schemagen.toml` in `dir` if present, or defaults
    pub fn discover(explicit: Option<&Path>, dir: impl AsRef<Path>) -> EngineResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            return Self::load(candidate);
        }

        Ok(Self::default())
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        database: Option<DatabaseType>,
        no_safe: bool,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        if no_safe {
            self.safe = false;
        }
        if output_dir.is_some() {
            self.output_dir = output_dir;
        }
        self
    }

    /// Generator settings derived from this config
    pub fn generator_config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::new().with_database(self.database);
        if self.safe { config } else { config.unsafe_create() }
    }

    /// Script file name: `<YYYYMMDD>000001_<file_prefix>.sql`
    pub fn script_filename(&self, date: NaiveDate) -> String {
        format!("{}{:06}_{}.sql", date.format("%Y%m%d"), 1, self.file_prefix)
    }
}

// ============================================================================
// Tests
// ============================================================================
