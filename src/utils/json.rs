// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed accessors over `serde_json` objects.
//!
//! Manifests and executor specifications are read field by field rather than
//! through `#[derive(Deserialize)]`, because unknown members must survive a
//! round trip and every type mismatch has to name the offending field. The
//! accessors return [`FieldError`], which each subsystem wraps into its own
//! error type together with the source file.

use serde_json::{Map, Value};
use std::fmt;

/// A JSON member had the wrong type, or a required member was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError(pub String);

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FieldError {}

pub type FieldResult<T> = Result<T, FieldError>;

/// Returns a string member, `None` when absent or `null`.
pub fn opt_str<'a>(object: &'a Map<String, Value>, key: &str) -> FieldResult<Option<&'a str>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(FieldError(format!(
            "\"{}\" must be a string, but it is {}",
            key, other
        ))),
    }
}

pub fn req_str<'a>(object: &'a Map<String, Value>, key: &str) -> FieldResult<&'a str> {
    opt_str(object, key)?
        .ok_or_else(|| FieldError(format!("required \"{}\" string is missing", key)))
}

pub fn opt_bool(object: &Map<String, Value>, key: &str, default: bool) -> FieldResult<bool> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(FieldError(format!(
            "\"{}\" must be a boolean, but it is {}",
            key, other
        ))),
    }
}

pub fn opt_array<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> FieldResult<Option<&'a Vec<Value>>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => Ok(Some(values)),
        Some(other) => Err(FieldError(format!(
            "\"{}\" must be an array, but it is {}",
            key, other
        ))),
    }
}

pub fn opt_object<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> FieldResult<Option<&'a Map<String, Value>>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(FieldError(format!(
            "\"{}\" must be an object, but it is {}",
            key, other
        ))),
    }
}

/// Converts every element of the named array to a string.
///
/// A single non-string element fails the whole conversion.
pub fn string_array(values: &[Value], key: &str) -> FieldResult<Vec<String>> {
    values
        .iter()
        .map(|value| match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(FieldError(format!(
                "\"{}\" array contains non-string element {}",
                key, other
            ))),
        })
        .collect()
}

/// Returns the objects of a required array member.
pub fn req_objects<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> FieldResult<Vec<&'a Map<String, Value>>> {
    let values = opt_array(object, key)?
        .ok_or_else(|| FieldError(format!("required \"{}\" array is missing", key)))?;
    objects(values, key)
}

pub fn objects<'a>(values: &'a [Value], key: &str) -> FieldResult<Vec<&'a Map<String, Value>>> {
    values
        .iter()
        .map(|value| match value {
            Value::Object(inner) => Ok(inner),
            other => Err(FieldError(format!(
                "\"{}\" array contains non-object element {}",
                key, other
            ))),
        })
        .collect()
}

/// Returns `base` with every entry of `overrides` put on top of it.
///
/// Keys present only in `base` keep their values; this is how default values
/// are provided for keys absent in a source document.
pub fn override_entries(mut base: Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overrides {
        base.insert(key.clone(), value.clone());
    }
    base
}

/// Pretty-prints a JSON value. Serializing a `Value` cannot fail.
pub fn to_pretty_string(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
