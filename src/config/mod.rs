// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;


pub use loader::{load_config, ExtensionsConfig, RuntimeConfig, SettingsConfig};
pub use runtime::{Runtime, RuntimeBuilder};
