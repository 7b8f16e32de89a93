// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types, one enum per subsystem.

mod extension;
mod loader;
mod marshal;
mod runtime;
mod settings;

pub use extension::{ExtensionError, ExtensionResult};
pub use loader::{LoaderError, LoaderResult};
pub use marshal::{MarshalError, MarshalResult};
pub use runtime::RuntimeError;
pub use settings::{SettingsError, SettingsResult};

use std::path::Path;

/// Formats an optional source file as a message suffix: `""` or `" <path>"`.
pub(crate) fn in_file(file: &Option<std::path::PathBuf>) -> String {
    file.as_deref()
        .map(|f: &Path| format!(" {}", f.display()))
        .unwrap_or_default()
}
