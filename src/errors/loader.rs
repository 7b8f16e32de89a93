// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::in_file;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the worker loader and from executor and mapping specification documents.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Executor \"{0}\" is not registered")]
    NotRegistered(String),

    #[error("Invalid executor specification{}: {message}", in_file(.file))]
    Format {
        file: Option<PathBuf>,
        message: String,
    },

    #[error("Invalid mapping specification{}: {message}", in_file(.file))]
    MappingFormat {
        file: Option<PathBuf>,
        message: String,
    },

    #[error("Cannot parse specification JSON{}: {source}", in_file(.file))]
    Json {
        file: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type LoaderResult<T> = Result<T, LoaderError>;
