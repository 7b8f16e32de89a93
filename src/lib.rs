// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // runtime config + host assembly
pub mod data;          // multi-channel payload marshalling
pub mod errors;        // error handling
pub mod extension;     // extension manifests + platform registry
pub mod loader;        // executor specifications + worker cache
pub mod mappings;      // key mappings + mapping interpreter
pub mod observability;
pub mod ports;         // chain port model
pub mod settings;      // settings combination engine
pub mod utils;
