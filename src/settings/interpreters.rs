// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Executors that combine or split the settings document of one settings specification.
//!
//! Each executor keeps a private copy of its combiner, taken from the
//! combiner loader on first use through a [`WorkerSlot`].

use super::combiner::{CombinerLoader, SettingsCombiner};
use crate::errors::{SettingsError, SettingsResult};
use crate::loader::WorkerSlot;
use crate::observability::messages::settings::{SettingsCombined, SettingsSplit};
use crate::observability::messages::StructuredLog;
use crate::utils::to_pretty_string;
use serde_json::{Map, Value};
use std::time::Instant;

/// Result of one settings executor run.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsOutput {
    /// Pretty-printed settings document
    pub settings: String,
    /// System output: the settings name of the specification that produced `settings`
    pub settings_name: String,
}

/// Puts an input settings document on top of the current parameter values.
#[derive(Debug)]
pub struct CombineSettings {
    combiner: WorkerSlot<SettingsCombiner>,
}

impl CombineSettings {
    pub fn new(settings_id: impl Into<String>) -> Self {
        Self {
            combiner: WorkerSlot::new(settings_id),
        }
    }

    pub fn settings_id(&self) -> &str {
        self.combiner.worker_id()
    }

    /// Combines `input` (JSON object text, empty meaning `{}`) with `parameters`.
    pub fn execute(
        &self,
        combiners: &CombinerLoader,
        parameters: &Map<String, Value>,
        input: &str,
    ) -> SettingsResult<SettingsOutput> {
        let combiner = self.combiner.get_or_instantiate(combiners)?;
        let document = parse_document(input)?;

        let start = Instant::now();
        let settings = combiner.combine(combiners, parameters, &document)?;
        SettingsCombined {
            settings_name: combiner.name(),
            duration: start.elapsed(),
        }
        .log();

        Ok(output(combiner, settings))
    }
}

/// Writes an input settings document back into the parameter values.
#[derive(Debug)]
pub struct SplitSettings {
    combiner: WorkerSlot<SettingsCombiner>,
}

impl SplitSettings {
    pub fn new(settings_id: impl Into<String>) -> Self {
        Self {
            combiner: WorkerSlot::new(settings_id),
        }
    }

    pub fn settings_id(&self) -> &str {
        self.combiner.worker_id()
    }

    /// Splits `input` into `parameters` and returns the resulting combined document.
    pub fn execute(
        &self,
        combiners: &CombinerLoader,
        parameters: &mut Map<String, Value>,
        input: &str,
    ) -> SettingsResult<SettingsOutput> {
        let combiner = self.combiner.get_or_instantiate(combiners)?;
        let document = parse_document(input)?;

        let start = Instant::now();
        let settings = combiner.split(combiners, parameters, &document)?;
        SettingsSplit {
            settings_name: combiner.name(),
            duration: start.elapsed(),
        }
        .log();

        Ok(output(combiner, settings))
    }
}

fn parse_document(input: &str) -> SettingsResult<Map<String, Value>> {
    if input.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(input)? {
        Value::Object(document) => Ok(document),
        other => Err(SettingsError::InvalidDocument(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn output(combiner: &SettingsCombiner, settings: Map<String, Value>) -> SettingsOutput {
    SettingsOutput {
        settings: to_pretty_string(&Value::Object(settings)),
        settings_name: combiner.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoaderError;
    use crate::loader::{ControlSpecification, ExecutorSpecification};
    use serde_json::json;
    use std::sync::Arc;

    fn combiners() -> CombinerLoader {
        let combiners = CombinerLoader::new();
        let specification = ExecutorSpecification::new("threshold-settings", "Threshold")
            .with_settings_role("threshold")
            .with_control(ControlSpecification::new("level", "float").with_default(json!(0.5)))
            .with_control(ControlSpecification::new("invert", "boolean").with_default(json!(false)));
        let combiner = SettingsCombiner::new(Arc::new(specification)).unwrap();
        combiners.register("threshold-settings", combiner);
        combiners
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_combine_settings() {
        struct TestCase {
            name: &'static str,
            input: &'static str,
            expected: Value,
        }

        let test_cases = vec![
            TestCase {
                name: "empty input means empty document",
                input: "  ",
                expected: json!({"level": 0.5, "invert": false}),
            },
            TestCase {
                name: "document overrides defaults",
                input: r#"{"invert": true}"#,
                expected: json!({"level": 0.5, "invert": true}),
            },
        ];

        let combiners = combiners();
        let executor = CombineSettings::new("threshold-settings");
        for tc in test_cases {
            let output = executor.execute(&combiners, &Map::new(), tc.input).unwrap();
            assert_eq!(parse(&output.settings), tc.expected, "case: {}", tc.name);
            assert_eq!(output.settings_name, "threshold", "case: {}", tc.name);
        }
    }

    #[test]
    fn test_split_settings_updates_parameters() {
        let combiners = combiners();
        let executor = SplitSettings::new("threshold-settings");
        let mut parameters = Map::new();

        let output = executor
            .execute(&combiners, &mut parameters, r#"{"level": 0.75}"#)
            .unwrap();

        assert_eq!(parameters.get("level"), Some(&json!(0.75)));
        assert_eq!(parse(&output.settings), json!({"level": 0.75, "invert": false}));
        assert!(output.settings.contains('\n'));
    }

    #[test]
    fn test_executor_keeps_first_copy() {
        let combiners = combiners();
        let executor = CombineSettings::new("threshold-settings");
        executor.execute(&combiners, &Map::new(), "").unwrap();

        combiners.remove("threshold-settings");
        let output = executor.execute(&combiners, &Map::new(), "").unwrap();
        assert_eq!(output.settings_name, "threshold");
    }

    #[test]
    fn test_invalid_input() {
        let combiners = combiners();
        let executor = CombineSettings::new("threshold-settings");

        assert!(matches!(
            executor.execute(&combiners, &Map::new(), "[1, 2]"),
            Err(SettingsError::InvalidDocument(ref message)) if message.contains("an array")
        ));
        assert!(matches!(
            executor.execute(&combiners, &Map::new(), "{"),
            Err(SettingsError::Json(_))
        ));

        let unknown = SplitSettings::new("absent");
        assert_eq!(unknown.settings_id(), "absent");
        assert!(matches!(
            unknown.execute(&combiners, &mut Map::new(), ""),
            Err(SettingsError::Loader(LoaderError::NotRegistered(_)))
        ));
    }
}
