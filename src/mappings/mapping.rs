// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::specification::MappingSpecification;
use crate::errors::LoaderResult;
use crate::loader::{read_all_json_if_valid, WorkerLoader};
use crate::observability::messages::mapping::{MappingLoadFailed, MappingsLoaded};
use crate::observability::messages::StructuredLog;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Loader of mapping workers keyed by mapping id.
pub type MappingLoader = WorkerLoader<Mapping>;

/// Worker that turns parameter values into a mapping document.
#[derive(Debug, Clone)]
pub struct Mapping {
    specification: Arc<MappingSpecification>,
}

impl Mapping {
    pub fn new(specification: Arc<MappingSpecification>) -> Self {
        Self { specification }
    }

    pub fn id(&self) -> &str {
        self.specification.id()
    }

    pub fn name(&self) -> &str {
        self.specification.name()
    }

    pub fn specification(&self) -> &MappingSpecification {
        &self.specification
    }

    /// Builds the mapping document: one entry per key, in key order.
    ///
    /// A key takes its value from `parameters`, else from the template
    /// default; a key with neither is left out. Parameters that are not
    /// keys are ignored.
    pub fn create_mapping(&self, parameters: &Map<String, Value>) -> Map<String, Value> {
        let default = self.specification.control_template().default.as_ref();
        self.specification
            .keys()
            .iter()
            .filter_map(|key| {
                parameters
                    .get(key)
                    .or(default)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }
}

/// Registers a mapping worker for every mapping specification under `folder`.
///
/// JSON files that are not mapping specifications are skipped; a malformed
/// mapping fails the whole folder. Returns the number registered.
pub fn load_mappings(folder: &Path, mappings: &MappingLoader) -> LoaderResult<usize> {
    let specifications = read_all_json_if_valid(folder, |file| {
        MappingSpecification::load_from_file_if_recognized(file).inspect_err(|error| {
            MappingLoadFailed {
                file: &file.display().to_string(),
                error,
            }
            .log()
        })
    })?;
    let count = specifications.len();
    for specification in specifications {
        let id = specification.id().to_string();
        mappings.register(id, Mapping::new(Arc::new(specification)));
    }
    MappingsLoaded {
        folder: &folder.display().to_string(),
        count,
    }
    .log();
    Ok(count)
}
