// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ExtensionError, LoaderError, SettingsError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors while building the runtime host from its YAML configuration.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Cannot read runtime config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime config {}: {source}", .path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Settings search is incomplete, unresolved sub-settings: {}", .unresolved.join(", "))]
    IncompleteSettings { unresolved: Vec<String> },

    #[error(transparent)]
    Extension(#[from] ExtensionError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
