//! Serialization and deserialization for schemagen model files
//!
//! Model files are pretty-printed JSON wrapped in a `ModelFile` envelope that
//! records the schema version. Bare `ModelGraph` JSON is accepted on load.

use crate::{ModelGraph, SCHEMA_VERSION};
use schemagen_core::{EngineError, EngineResult, Persistable};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Model File Wrapper
// ============================================================================

/// Wrapper for model files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Schema version of the file layout
    pub schema_version: u32,

    /// The model data
    pub model: ModelGraph,
}

impl ModelFile {
    /// Create a new model file at the current schema version
    pub fn new(model: ModelGraph) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            model,
        }
    }

    /// Reject files written by a newer version of the tool
    pub fn check_version(&self) -> EngineResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(EngineError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        Ok(())
    }
}

impl Persistable for ModelFile {
    fn file_extension() -> &'static str {
        crate::MODEL_FILE_EXTENSION
    }

    fn schema_version() -> u32 {
        SCHEMA_VERSION
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a model to a file
///
/// # Example
///
/// ```rust,ignore
/// use schemagen_ir::{ModelGraph, save_model};
///
/// let model = ModelGraph::new("Shop");
/// save_model(&model, "shop.json").unwrap();
/// ```
pub fn save_model(model: &ModelGraph, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::FileWrite {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    ModelFile::new(model.clone()).save_to_file(path)
}

/// Save a model to a JSON string
pub fn save_model_to_string(model: &ModelGraph) -> EngineResult<String> {
    ModelFile::new(model.clone()).to_json()
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a model from a file and normalise derived names
pub fn load_model(path: impl AsRef<Path>) -> EngineResult<ModelGraph> {
    let path = path.as_ref();

    let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_model_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid model file format: {}", je),
        },
        other => other,
    })
}

/// Load a model from a JSON string
pub fn load_model_from_string(json: &str) -> EngineResult<ModelGraph> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let mut model = if value.get("schema_version").is_some() {
        let file: ModelFile = serde_json::from_value(value)?;
        file.check_version()?;
        file.model
    } else if value.get("meta").is_some() {
        serde_json::from_value(value)?
    } else {
        return Err(EngineError::InvalidModelFormat(
            "expected a model file with `schema_version` or a bare model with `meta`".to_string(),
        ));
    };

    model.normalize()?;
    Ok(model)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, Field, Relationship};
    use schemagen_core::DataType;
    use tempfile::tempdir;

    fn sample_model() -> ModelGraph {
        ModelGraph::new("Tournaments")
            .with_entity(Entity::new("Tournament").in_namespace("test_schema"))
            .with_entity(
                Entity::new("Event")
                    .with_field(Field::new("name", DataType::Text))
                    .with_relationship(Relationship::foreign_key("tournament", "Tournament")),
            )
    }

    #[test]
    fn test_save_and_load_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("tournaments.json");

        let model = sample_model();
        save_model(&model, &path).unwrap();
        assert!(path.exists());

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_load_bare_model() {
        let json = r#"{
            "meta": {"name": "Bare"},
            "entities": [
                {"name": "Team", "fields": [
                    {"name": "id", "data_type": {"kind": "Int32"}, "is_primary_key": true, "generated": true}
                ]}
            ]
        }"#;
        let model = load_model_from_string(json).unwrap();
        assert_eq!(model.meta.version, "0.1.0");
        assert_eq!(model.entities[0].table_name, "team");
    }

    #[test]
    fn test_future_version_rejected() {
        let mut value = serde_json::to_value(ModelFile::new(sample_model())).unwrap();
        value["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);

        let err = load_model_from_string(&value.to_string()).unwrap_err();
        assert!(matches!(err, EngineError::SchemaVersionMismatch { .. }));
    }

    #[test]
    fn test_unrecognised_document() {
        let err = load_model_from_string(r#"{"tables": []}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidModelFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_model("/nonexistent/model.json").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_save_to_string_has_version() {
        let json = save_model_to_string(&sample_model()).unwrap();
        assert!(json.contains("\"schema_version\": 1"));
    }
}
