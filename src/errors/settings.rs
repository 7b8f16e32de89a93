// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::LoaderError;
use thiserror::Error;

/// Errors from settings combination, splitting and the smart settings search.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A query was issued before the step that prepares its answer.
    #[error("{0}")]
    IllegalState(&'static str),

    /// Sub-settings references loop back on themselves.
    #[error("Settings reference cycle detected: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    #[error("Executor \"{0}\" is not a settings specification")]
    NotSettings(String),

    #[error("Sub-settings \"{settings_id}\" of control \"{control}\" is not registered")]
    SubSettingsNotFound { control: String, settings_id: String },

    #[error("Invalid settings document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("Cannot parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;
