// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Executor specification documents.
//!
//! A specification describes one executor: identity, ports, controls and an
//! optional role. Specifications whose role carries `"settings": true` are
//! settings specifications and can be turned into a
//! [`SettingsCombiner`](crate::settings::SettingsCombiner).

use crate::errors::{LoaderError, LoaderResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Value of the `"app"` marker of executor specifications
pub const EXECUTOR_APP_NAME: &str = "executor";
/// Specification version written when a document omits it
pub const EXECUTOR_CURRENT_VERSION: &str = "0.0.1";
/// Value type of controls that hold nested settings
pub const SETTINGS: &str = "settings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpecification {
    pub name: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl PortSpecification {
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            caption: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpecification {
    pub name: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Id of the settings specification behind a sub-settings control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ControlSpecification {
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            default: None,
            settings_id: None,
            caption: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// A sub-settings control backed by the settings specification `settings_id`.
    pub fn sub_settings(name: impl Into<String>, settings_id: Option<String>) -> Self {
        Self {
            settings_id,
            ..Self::new(name, SETTINGS)
        }
    }

    pub fn is_sub_settings(&self) -> bool {
        self.value_type == SETTINGS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpecification {
    pub name: String,
    #[serde(default)]
    pub settings: bool,
}

/// On-disk shape of a specification.
#[derive(Serialize, Deserialize)]
struct SpecificationDocument {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<RoleSpecification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    in_ports: Vec<PortSpecification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    out_ports: Vec<PortSpecification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    controls: Vec<ControlSpecification>,
}

fn default_version() -> String {
    EXECUTOR_CURRENT_VERSION.to_string()
}

/// Specification of one executor.
///
/// Controls sit behind the specification's own lock: they may be added or
/// removed while other threads read them, so every read takes a snapshot or
/// runs under [`with_controls`](Self::with_controls).
#[derive(Debug)]
pub struct ExecutorSpecification {
    file: Option<PathBuf>,
    version: String,
    id: String,
    name: String,
    category: Option<String>,
    description: Option<String>,
    role: Option<RoleSpecification>,
    in_ports: Vec<PortSpecification>,
    out_ports: Vec<PortSpecification>,
    controls: RwLock<Vec<ControlSpecification>>,
}

impl Clone for ExecutorSpecification {
    fn clone(&self) -> Self {
        Self {
            file: self.file.clone(),
            version: self.version.clone(),
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            role: self.role.clone(),
            in_ports: self.in_ports.clone(),
            out_ports: self.out_ports.clone(),
            controls: RwLock::new(self.controls.read().clone()),
        }
    }
}

impl ExecutorSpecification {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: None,
            version: EXECUTOR_CURRENT_VERSION.to_string(),
            id: id.into(),
            name: name.into(),
            category: None,
            description: None,
            role: None,
            in_ports: Vec::new(),
            out_ports: Vec::new(),
            controls: RwLock::new(Vec::new()),
        }
    }

    /// Marks this specification as the settings specification named `settings_name`.
    pub fn with_settings_role(mut self, settings_name: impl Into<String>) -> Self {
        self.role = Some(RoleSpecification {
            name: settings_name.into(),
            settings: true,
        });
        self
    }

    pub fn with_in_port(mut self, port: PortSpecification) -> Self {
        self.in_ports.push(port);
        self
    }

    pub fn with_out_port(mut self, port: PortSpecification) -> Self {
        self.out_ports.push(port);
        self
    }

    pub fn with_control(self, control: ControlSpecification) -> Self {
        self.add_control(control);
        self
    }

    pub fn parse(json: &Value, file: Option<&Path>) -> LoaderResult<Self> {
        if !Self::is_executor_document(json) {
            return Err(LoaderError::Format {
                file: file.map(Path::to_path_buf),
                message: format!("no \"app\":\"{}\" element", EXECUTOR_APP_NAME),
            });
        }
        let document =
            SpecificationDocument::deserialize(json).map_err(|source| LoaderError::Json {
                file: file.map(Path::to_path_buf),
                source,
            })?;
        Ok(Self::from_document(document, file))
    }

    pub fn load_from_file(path: &Path) -> LoaderResult<Self> {
        let json = read_json(path)?;
        Self::parse(&json, Some(path))
    }

    /// Reads a specification file, returning `Ok(None)` when it is not an executor specification.
    pub fn load_from_file_if_recognized(path: &Path) -> LoaderResult<Option<Self>> {
        let json = read_json(path)?;
        if !Self::is_executor_document(&json) {
            return Ok(None);
        }
        Self::parse(&json, Some(path)).map(Some)
    }

    pub fn is_executor_document(json: &Value) -> bool {
        json.get("app").and_then(Value::as_str) == Some(EXECUTOR_APP_NAME)
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

    pub fn role(&self) -> Option<&RoleSpecification> {
        self.role.as_ref()
    }

    pub fn is_role_settings(&self) -> bool {
        self.role.as_ref().is_some_and(|role| role.settings)
    }

    /// Name under which a settings specification is known to other settings.
    pub fn settings_name(&self) -> Option<&str> {
        self.role
            .as_ref()
            .filter(|role| role.settings)
            .map(|role| role.name.as_str())
    }

    pub fn in_ports(&self) -> &[PortSpecification] {
        &self.in_ports
    }

    pub fn out_ports(&self) -> &[PortSpecification] {
        &self.out_ports
    }

    /// Snapshot of the controls, in declaration order.
    pub fn controls(&self) -> Vec<ControlSpecification> {
        self.controls.read().clone()
    }

    pub fn control(&self, name: &str) -> Option<ControlSpecification> {
        self.controls.read().iter().find(|c| c.name == name).cloned()
    }

    /// Runs `f` while holding the controls read lock.
    pub fn with_controls<R>(&self, f: impl FnOnce(&[ControlSpecification]) -> R) -> R {
        f(&self.controls.read())
    }

    /// Adds a control, replacing an existing control with the same name in place.
    pub fn add_control(&self, control: ControlSpecification) {
        let mut controls = self.controls.write();
        match controls.iter_mut().find(|c| c.name == control.name) {
            Some(existing) => *existing = control,
            None => controls.push(control),
        }
    }

    pub fn remove_control(&self, name: &str) -> Option<ControlSpecification> {
        let mut controls = self.controls.write();
        let index = controls.iter().position(|c| c.name == name)?;
        Some(controls.remove(index))
    }

    pub fn to_json(&self) -> Value {
        let document = SpecificationDocument {
            app: EXECUTOR_APP_NAME.to_string(),
            version: self.version.clone(),
            id: self.id.clone(),
            name: Some(self.name.clone()),
            category: self.category.clone(),
            description: self.description.clone(),
            role: self.role.clone(),
            in_ports: self.in_ports.clone(),
            out_ports: self.out_ports.clone(),
            controls: self.controls(),
        };
        // Serializing the document cannot fail: it holds only strings, flags,
        // lists of plain structs and JSON values, with no non-string map keys.
        serde_json::to_value(&document).unwrap_or_else(|_| {
            let mut fallback = Map::new();
            fallback.insert("app".to_string(), Value::String(document.app.clone()));
            fallback.insert("id".to_string(), Value::String(document.id.clone()));
            Value::Object(fallback)
        })
    }

    /// Compact serialized form, used to pre-select probable settings specifications.
    pub fn serialized(&self) -> String {
        self.to_json().to_string()
    }

    fn from_document(document: SpecificationDocument, file: Option<&Path>) -> Self {
        Self {
            file: file.map(Path::to_path_buf),
            version: document.version,
            name: document.name.unwrap_or_else(|| document.id.clone()),
            id: document.id,
            category: document.category,
            description: document.description,
            role: document.role,
            in_ports: document.in_ports,
            out_ports: document.out_ports,
            controls: RwLock::new(document.controls),
        }
    }
}

impl FromStr for ExecutorSpecification {
    type Err = LoaderError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let json: Value =
            serde_json::from_str(text).map_err(|source| LoaderError::Json { file: None, source })?;
        Self::parse(&json, None)
    }
}

pub(crate) fn read_json(path: &Path) -> LoaderResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoaderError::Json {
        file: Some(path.to_path_buf()),
        source,
    })
}
