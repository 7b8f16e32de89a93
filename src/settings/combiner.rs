// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Combining and splitting settings documents.
//!
//! A settings document is a JSON object with one entry per control of a
//! settings specification. A sub-settings control holds a nested object that
//! belongs to another settings specification, found by the control's
//! `settings_id` or, when that is absent, by matching the control name
//! against settings names.
//!
//! * `create_settings` builds a document from parameter values, filling
//!   absent parameters with control defaults.
//! * `combine` puts a document on top of `create_settings`, so keys absent
//!   in the document take their defaults.
//! * `split` is the reverse: it writes the document's values back into the
//!   parameters, descending into sub-settings, and returns the combined
//!   document.
//!
//! For any document `D`, `split(combine(D))` keeps every key of `D` and
//! `combine(split(D))` keeps every default-filled value.

use crate::errors::{SettingsError, SettingsResult};
use crate::loader::{ControlSpecification, ExecutorSpecification, WorkerLoader};
use crate::observability::messages::settings::{SettingsCombinerCreated, SettingsCycleDetected};
use crate::observability::messages::StructuredLog;
use crate::utils::override_entries;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Worker loader holding one combiner per settings specification id.
pub type CombinerLoader = WorkerLoader<SettingsCombiner>;

/// Combines and splits documents of one settings specification.
///
/// Cloning is cheap: the specification is shared.
#[derive(Debug, Clone)]
pub struct SettingsCombiner {
    specification: Arc<ExecutorSpecification>,
    settings_name: String,
}

impl SettingsCombiner {
    /// # Errors
    /// [`SettingsError::NotSettings`] unless the specification has a settings role.
    pub fn new(specification: Arc<ExecutorSpecification>) -> SettingsResult<Self> {
        let settings_name = specification
            .settings_name()
            .ok_or_else(|| SettingsError::NotSettings(specification.id().to_string()))?
            .to_string();
        SettingsCombinerCreated {
            settings_id: specification.id(),
            settings_name: &settings_name,
            control_count: specification.with_controls(|controls| controls.len()),
        }
        .log();
        Ok(Self {
            specification,
            settings_name,
        })
    }

    /// Creates and registers a combiner for every settings specification in
    /// `specifications`. Returns the number of combiners registered.
    pub fn register_all(
        specifications: &WorkerLoader<ExecutorSpecification>,
        combiners: &CombinerLoader,
    ) -> SettingsResult<usize> {
        let mut count = 0;
        for (id, specification) in specifications.entries() {
            if specification.is_role_settings() {
                combiners.register(id, Self::new(specification)?);
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn id(&self) -> &str {
        self.specification.id()
    }

    pub fn name(&self) -> &str {
        &self.settings_name
    }

    pub fn specification(&self) -> &ExecutorSpecification {
        &self.specification
    }

    /// Document made of control defaults only.
    pub fn defaults(&self, combiners: &CombinerLoader) -> SettingsResult<Map<String, Value>> {
        self.create_settings(combiners, &Map::new())
    }

    pub fn create_settings(
        &self,
        combiners: &CombinerLoader,
        parameters: &Map<String, Value>,
    ) -> SettingsResult<Map<String, Value>> {
        self.create_settings_at(combiners, parameters, &mut self.root_path())
    }

    pub fn combine(
        &self,
        combiners: &CombinerLoader,
        parameters: &Map<String, Value>,
        document: &Map<String, Value>,
    ) -> SettingsResult<Map<String, Value>> {
        self.combine_at(combiners, parameters, document, &mut self.root_path())
    }

    /// Writes the values of `document` into `parameters` and returns the
    /// combined document.
    pub fn split(
        &self,
        combiners: &CombinerLoader,
        parameters: &mut Map<String, Value>,
        document: &Map<String, Value>,
    ) -> SettingsResult<Map<String, Value>> {
        self.split_at(combiners, parameters, document, &mut self.root_path())?;
        self.combine(combiners, parameters, document)
    }

    fn root_path(&self) -> Vec<String> {
        vec![self.id().to_string()]
    }

    fn create_settings_at(
        &self,
        combiners: &CombinerLoader,
        parameters: &Map<String, Value>,
        path: &mut Vec<String>,
    ) -> SettingsResult<Map<String, Value>> {
        let mut result = Map::new();
        for control in self.specification.controls() {
            if control.is_sub_settings() {
                let sub_parameters = object_or_empty(parameters.get(&control.name));
                let value = self.descend(combiners, &control, path, |sub, path| {
                    sub.create_settings_at(combiners, &sub_parameters, path)
                })?;
                result.insert(control.name, Value::Object(value));
            } else if let Some(value) = parameters
                .get(&control.name)
                .filter(|v| !v.is_null())
                .or(control.default.as_ref())
            {
                result.insert(control.name.clone(), value.clone());
            }
        }
        Ok(result)
    }

    fn combine_at(
        &self,
        combiners: &CombinerLoader,
        parameters: &Map<String, Value>,
        document: &Map<String, Value>,
        path: &mut Vec<String>,
    ) -> SettingsResult<Map<String, Value>> {
        let created = self.create_settings_at(combiners, parameters, path)?;
        let mut result = override_entries(created, document);
        for control in self.specification.controls() {
            if !control.is_sub_settings() {
                continue;
            }
            if let Some(Value::Object(sub_document)) = document.get(&control.name) {
                let sub_parameters = object_or_empty(parameters.get(&control.name));
                let merged = self.descend(combiners, &control, path, |sub, path| {
                    sub.combine_at(combiners, &sub_parameters, sub_document, path)
                })?;
                result.insert(control.name, Value::Object(merged));
            }
        }
        Ok(result)
    }

    fn split_at(
        &self,
        combiners: &CombinerLoader,
        parameters: &mut Map<String, Value>,
        document: &Map<String, Value>,
        path: &mut Vec<String>,
    ) -> SettingsResult<()> {
        for control in self.specification.controls() {
            let Some(value) = document.get(&control.name) else {
                continue;
            };
            match value {
                Value::Object(sub_document) if control.is_sub_settings() => {
                    let entry = parameters
                        .entry(control.name.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if !entry.is_object() {
                        *entry = Value::Object(Map::new());
                    }
                    if let Value::Object(sub_parameters) = entry {
                        self.descend(combiners, &control, path, |sub, path| {
                            sub.split_at(combiners, sub_parameters, sub_document, path)
                        })?;
                    }
                }
                _ => {
                    parameters.insert(control.name.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    /// Runs `f` on the combiner behind a sub-settings control, with the
    /// combiner's id pushed onto the reference path.
    fn descend<R>(
        &self,
        combiners: &CombinerLoader,
        control: &ControlSpecification,
        path: &mut Vec<String>,
        f: impl FnOnce(&SettingsCombiner, &mut Vec<String>) -> SettingsResult<R>,
    ) -> SettingsResult<R> {
        let sub = resolve_sub_settings(combiners, control)?;
        if let Some(start) = path.iter().position(|id| id == sub.id()) {
            let mut cycle = path[start..].to_vec();
            cycle.push(sub.id().to_string());
            SettingsCycleDetected { cycle: &cycle }.log();
            return Err(SettingsError::Cycle { cycle });
        }
        path.push(sub.id().to_string());
        let result = f(&*sub, path);
        path.pop();
        result
    }
}

/// Finds the combiner behind a sub-settings control.
///
/// An explicit `settings_id` is looked up by id; otherwise the control name
/// is matched against settings names (first match in id order).
pub fn resolve_sub_settings(
    combiners: &CombinerLoader,
    control: &ControlSpecification,
) -> SettingsResult<Arc<SettingsCombiner>> {
    let found = match &control.settings_id {
        Some(id) => combiners.get(id),
        None => combiners
            .find(|combiner| combiner.name() == control.name)
            .map(|(_, combiner)| combiner),
    };
    found.ok_or_else(|| SettingsError::SubSettingsNotFound {
        control: control.name.clone(),
        settings_id: control
            .settings_id
            .clone()
            .unwrap_or_else(|| control.name.clone()),
    })
}

fn object_or_empty(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(object)) => object.clone(),
        _ => Map::new(),
    }
}
