// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ExtensionError, ExtensionResult};
use crate::utils::json::{opt_str, req_str, FieldResult};
use serde_json::{Map, Value};

/// Another platform this platform relies on. Sealed together with its platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    id: String,
    name: Option<String>,
    description: Option<String>,
    immutable: bool,
}

impl Dependency {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            immutable: false,
        }
    }

    pub(crate) fn parse(object: &Map<String, Value>) -> FieldResult<Self> {
        Ok(Self {
            id: req_str(object, "id")?.to_string(),
            name: opt_str(object, "name")?.map(str::to_string),
            description: opt_str(object, "description")?.map(str::to_string),
            immutable: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.id = id.into();
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.name = name;
        Ok(self)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.description = description;
        Ok(self)
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn set_immutable(&mut self) {
        self.immutable = true;
    }

    pub fn to_json(&self) -> Map<String, Value> {
        let mut result = Map::new();
        result.insert("id".to_string(), Value::String(self.id.clone()));
        if let Some(name) = &self.name {
            result.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(description) = &self.description {
            result.insert("description".to_string(), Value::String(description.clone()));
        }
        result
    }

    fn check_mutable(&self) -> ExtensionResult<()> {
        if self.immutable {
            Err(ExtensionError::ImmutableState("The platform dependency"))
        } else {
            Ok(())
        }
    }
}
