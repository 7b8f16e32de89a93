// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::utils::json::{opt_array, opt_bool, string_array, FieldResult};
use serde_json::{Map, Value};

/// Technology-specific platform configuration.
///
/// Known members (`classpath`, `require_existing_paths`, `vm_options`) are
/// extracted on construction; the whole object is kept as `source` and is
/// what [`to_json`](Self::to_json) returns, so members this crate does not
/// know about survive a round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    source: Map<String, Value>,
    classpath: Vec<String>,
    require_existing_paths: bool,
    vm_options: Option<Vec<String>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(source: &Map<String, Value>) -> FieldResult<Self> {
        let classpath = match opt_array(source, "classpath")? {
            Some(values) => string_array(values, "classpath")?,
            None => Vec::new(),
        };
        let vm_options = opt_array(source, "vm_options")?
            .map(|values| string_array(values, "vm_options"))
            .transpose()?;
        Ok(Self {
            source: source.clone(),
            classpath,
            require_existing_paths: opt_bool(source, "require_existing_paths", false)?,
            vm_options,
        })
    }

    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// Classpath-like resource list; empty when not applicable.
    pub fn classpath(&self) -> &[String] {
        &self.classpath
    }

    pub fn require_existing_paths(&self) -> bool {
        self.require_existing_paths
    }

    /// `None` for technologies without VM options.
    pub fn vm_options(&self) -> Option<&[String]> {
        self.vm_options.as_deref()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.source.clone()
    }
}
