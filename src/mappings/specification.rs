// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{LoaderError, LoaderResult};
use crate::loader::{read_json, ControlSpecification};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Value of `"app"` that marks a mapping specification
pub const MAPPING_APP_NAME: &str = "mapping";
/// Mapping version written when a document omits it
pub const MAPPING_CURRENT_VERSION: &str = "0.0.1";

/// Control shape shared by every key of a mapping.
///
/// # Fields
/// * `value_type` - Value type of each per-key control
/// * `default` - Value used for a key the parameters do not set
/// * `caption` - Optional caption shown before the key name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlTemplate {
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Default for ControlTemplate {
    fn default() -> Self {
        Self {
            value_type: "string".to_string(),
            default: None,
            caption: None,
        }
    }
}

/// On-disk shape of a mapping specification.
#[derive(Serialize, Deserialize)]
struct MappingDocument {
    app: String,
    #[serde(default = "default_version")]
    version: String,
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    control_template: ControlTemplate,
}

fn default_version() -> String {
    MAPPING_CURRENT_VERSION.to_string()
}

/// Specification of a mapping: a fixed list of keys, each backed by a
/// control built from one shared template.
///
/// # Example
/// ```
/// use the_chainworks::mappings::MappingSpecification;
///
/// let specification: MappingSpecification = r#"{
///     "app": "mapping",
///     "id": "channel-weights",
///     "keys": ["red", "green", "blue"],
///     "control_template": {"value_type": "float", "default": 1.0}
/// }"#
/// .parse()
/// .unwrap();
///
/// assert_eq!(specification.name(), "channel-weights");
/// assert_eq!(specification.keys(), &["red", "green", "blue"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSpecification {
    file: Option<PathBuf>,
    version: String,
    id: String,
    name: String,
    category: Option<String>,
    description: Option<String>,
    keys: Vec<String>,
    control_template: ControlTemplate,
}

impl MappingSpecification {
    /// # Errors
    /// [`LoaderError::MappingFormat`] when the `"app"` marker is wrong, or
    /// when a key is empty or repeated.
    pub fn parse(json: &Value, file: Option<&Path>) -> LoaderResult<Self> {
        let format = |message: String| LoaderError::MappingFormat {
            file: file.map(Path::to_path_buf),
            message,
        };
        if !Self::is_mapping_document(json) {
            return Err(format(format!(
                "no \"app\":\"{}\" element",
                MAPPING_APP_NAME
            )));
        }
        let document = MappingDocument::deserialize(json).map_err(|source| LoaderError::Json {
            file: file.map(Path::to_path_buf),
            source,
        })?;

        let mut seen = HashSet::new();
        for key in &document.keys {
            if key.is_empty() {
                return Err(format("mapping keys must not be empty".to_string()));
            }
            if !seen.insert(key.as_str()) {
                return Err(format(format!("mapping key \"{}\" is repeated", key)));
            }
        }

        Ok(Self {
            file: file.map(Path::to_path_buf),
            version: document.version,
            name: document.name.unwrap_or_else(|| document.id.clone()),
            id: document.id,
            category: document.category,
            description: document.description,
            keys: document.keys,
            control_template: document.control_template,
        })
    }

    pub fn load_from_file(path: &Path) -> LoaderResult<Self> {
        let json = read_json(path)?;
        Self::parse(&json, Some(path))
    }

    /// Reads a JSON file, returning `Ok(None)` when it is not a mapping specification.
    pub fn load_from_file_if_recognized(path: &Path) -> LoaderResult<Option<Self>> {
        let json = read_json(path)?;
        if !Self::is_mapping_document(&json) {
            return Ok(None);
        }
        Self::parse(&json, Some(path)).map(Some)
    }

    pub fn is_mapping_document(json: &Value) -> bool {
        json.get("app").and_then(Value::as_str) == Some(MAPPING_APP_NAME)
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn control_template(&self) -> &ControlTemplate {
        &self.control_template
    }

    /// One control per key, in key order, shaped by the control template.
    pub fn controls(&self) -> Vec<ControlSpecification> {
        self.keys
            .iter()
            .map(|key| {
                let mut control = ControlSpecification::new(key.clone(), self.control_template.value_type.clone());
                control.default = self.control_template.default.clone();
                control.caption = Some(match &self.control_template.caption {
                    Some(caption) => format!("{} {}", caption, key),
                    None => key.clone(),
                });
                control
            })
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let mut result = Map::new();
        result.insert("app".to_string(), Value::String(MAPPING_APP_NAME.to_string()));
        result.insert("version".to_string(), Value::String(self.version.clone()));
        result.insert("id".to_string(), Value::String(self.id.clone()));
        result.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(category) = &self.category {
            result.insert("category".to_string(), Value::String(category.clone()));
        }
        if let Some(description) = &self.description {
            result.insert("description".to_string(), Value::String(description.clone()));
        }
        let keys = self.keys.iter().cloned().map(Value::String).collect();
        result.insert("keys".to_string(), Value::Array(keys));

        let mut template = Map::new();
        template.insert(
            "value_type".to_string(),
            Value::String(self.control_template.value_type.clone()),
        );
        if let Some(default) = &self.control_template.default {
            template.insert("default".to_string(), default.clone());
        }
        if let Some(caption) = &self.control_template.caption {
            template.insert("caption".to_string(), Value::String(caption.clone()));
        }
        result.insert("control_template".to_string(), Value::Object(template));
        Value::Object(result)
    }
}

impl FromStr for MappingSpecification {
    type Err = LoaderError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let json: Value =
            serde_json::from_str(text).map_err(|source| LoaderError::Json { file: None, source })?;
        Self::parse(&json, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn channel_weights() -> Value {
        json!({
            "app": "mapping",
            "version": "0.0.1",
            "id": "channel-weights",
            "name": "Channel weights",
            "category": "mappings",
            "keys": ["red", "green", "blue"],
            "control_template": {"value_type": "float", "default": 1.0, "caption": "Weight of"}
        })
    }

    #[test]
    fn test_parse_and_round_trip() {
        let source = channel_weights();
        let specification = MappingSpecification::parse(&source, None).unwrap();

        assert_eq!(specification.id(), "channel-weights");
        assert_eq!(specification.name(), "Channel weights");
        assert_eq!(specification.control_template().value_type, "float");
        assert_eq!(specification.to_json(), source);
    }

    #[test]
    fn test_controls_follow_template() {
        let specification = MappingSpecification::parse(&channel_weights(), None).unwrap();
        let controls = specification.controls();

        let names: Vec<&str> = controls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["red", "green", "blue"]);
        assert!(controls.iter().all(|c| c.value_type == "float"));
        assert!(controls.iter().all(|c| c.default == Some(json!(1.0))));
        assert_eq!(controls[1].caption.as_deref(), Some("Weight of green"));
    }

    #[test]
    fn test_rejects_invalid_documents() {
        struct TestCase {
            name: &'static str,
            json: Value,
            mapping_format: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "executor specification",
                json: json!({"app": "executor", "id": "x"}),
                mapping_format: true,
            },
            TestCase {
                name: "empty key",
                json: json!({"app": "mapping", "id": "x", "keys": ["a", ""]}),
                mapping_format: true,
            },
            TestCase {
                name: "repeated key",
                json: json!({"app": "mapping", "id": "x", "keys": ["a", "b", "a"]}),
                mapping_format: true,
            },
            TestCase {
                name: "keys not an array",
                json: json!({"app": "mapping", "id": "x", "keys": "a"}),
                mapping_format: false,
            },
            TestCase {
                name: "missing id",
                json: json!({"app": "mapping", "keys": []}),
                mapping_format: false,
            },
        ];

        for tc in test_cases {
            let error = MappingSpecification::parse(&tc.json, None).unwrap_err();
            assert_eq!(
                matches!(error, LoaderError::MappingFormat { .. }),
                tc.mapping_format,
                "case: {}: {}",
                tc.name,
                error
            );
        }
    }

    #[test]
    fn test_load_from_file_if_recognized() {
        let dir = TempDir::new().unwrap();
        let mapping = dir.path().join("weights.json");
        let executor = dir.path().join("blur.json");
        std::fs::write(&mapping, channel_weights().to_string()).unwrap();
        std::fs::write(&executor, json!({"app": "executor", "id": "blur"}).to_string()).unwrap();

        let loaded = MappingSpecification::load_from_file_if_recognized(&mapping)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.file(), Some(mapping.as_path()));
        assert!(MappingSpecification::load_from_file_if_recognized(&executor)
            .unwrap()
            .is_none());
        assert!(MappingSpecification::load_from_file(&executor).is_err());
    }
}
