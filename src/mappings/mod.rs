// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Mappings: fixed key lists turned into JSON documents from parameter values.
//!
//! A mapping specification lives in a models folder next to executor
//! specifications and is marked with `"app": "mapping"`. [`InterpretMapping`]
//! runs one registered mapping and emits the document and its keys.

mod interpreter;
mod mapping;
mod specification;

pub use interpreter::{InterpretMapping, MappingOutput, OUTPUT_KEYS, OUTPUT_MAPPING};
pub use mapping::{load_mappings, Mapping, MappingLoader};
pub use specification::{ControlTemplate, MappingSpecification, MAPPING_APP_NAME, MAPPING_CURRENT_VERSION};
