// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::mapping::{Mapping, MappingLoader};
use crate::errors::LoaderResult;
use crate::loader::WorkerSlot;
use crate::observability::messages::mapping::MappingCreated;
use crate::observability::messages::StructuredLog;
use crate::utils::to_pretty_string;
use serde_json::{Map, Value};
use std::time::Instant;

/// Name of the main output: the mapping document
pub const OUTPUT_MAPPING: &str = "mapping";
/// Name of the output listing the mapping keys
pub const OUTPUT_KEYS: &str = "keys";

/// Result of one mapping interpreter run.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutput {
    /// Pretty-printed mapping document
    pub mapping: String,
    /// Keys of the mapping document, one per line
    pub keys: String,
}

/// Executor that builds the mapping document of one registered mapping.
///
/// The mapping worker is copied from the loader on first use and kept for
/// later runs.
#[derive(Debug)]
pub struct InterpretMapping {
    mapping: WorkerSlot<Mapping>,
}

impl InterpretMapping {
    pub fn new(mapping_id: impl Into<String>) -> Self {
        Self {
            mapping: WorkerSlot::new(mapping_id),
        }
    }

    pub fn mapping_id(&self) -> &str {
        self.mapping.worker_id()
    }

    pub fn execute(
        &self,
        mappings: &MappingLoader,
        parameters: &Map<String, Value>,
    ) -> LoaderResult<MappingOutput> {
        let start = Instant::now();
        let mapping = self.mapping.get_or_instantiate(mappings)?;
        let document = mapping.create_mapping(parameters);
        let keys = document.keys().map(String::as_str).collect::<Vec<_>>().join("\n");
        let text = to_pretty_string(&Value::Object(document));

        MappingCreated {
            mapping_name: mapping.name(),
            duration: start.elapsed(),
            mapping: &text,
        }
        .log();

        Ok(MappingOutput {
            mapping: text,
            keys,
        })
    }
}
