// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while reading, validating and registering extension manifests.

use super::in_file;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for extension manifests, platforms and the platform registry.
///
/// The variants fall into the classes callers usually branch on:
/// - format: [`Format`](Self::Format), [`Json`](Self::Json), [`EmptyField`](Self::EmptyField)
/// - not found: [`FolderNotFound`](Self::FolderNotFound), [`FileNotFound`](Self::FileNotFound)
/// - configuration: [`RelativeFolderWithoutRoot`](Self::RelativeFolderWithoutRoot),
///   [`FolderNotSpecified`](Self::FolderNotSpecified),
///   [`MissingResourcePath`](Self::MissingResourcePath)
/// - registry: [`PlatformNotRegistered`](Self::PlatformNotRegistered),
///   [`DuplicatePlatformId`](Self::DuplicatePlatformId)
/// - state: [`ImmutableState`](Self::ImmutableState)
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// Document is well-formed JSON but is not a valid manifest.
    #[error("Invalid JSON{}: {message}", in_file(.file))]
    Format {
        file: Option<PathBuf>,
        message: String,
    },

    /// Document text is not JSON at all.
    #[error("Cannot parse JSON{}: {source}", in_file(.file))]
    Json {
        file: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    /// A field that must carry a non-empty string was empty.
    #[error("Empty \"{0}\" value is not allowed")]
    EmptyField(&'static str),

    #[error("Extension folder \"{}\" is not an existing directory", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Extension file \"{}\" does not exist in {}", .file.display(), .folder.display())]
    FileNotFound { file: PathBuf, folder: PathBuf },

    #[error(
        "The folder \"{folder}\" is relative and cannot be resolved, because the platform root \
         folder is not specified; it is probable when an extension JSON was not loaded from a \
         usual .json-file. You must use absolute paths in this case."
    )]
    RelativeFolderWithoutRoot { folder: String },

    #[error("Folder \"{0}\" is not specified in this platform")]
    FolderNotSpecified(&'static str),

    /// Required classpath entry is absent on disk.
    ///
    /// Reported as a plain I/O-class failure rather than a not-found error so the
    /// message keeps the whole classpath for the operator.
    #[error(
        "Invalid classpath{}: it contains non-existing path \"{}\" in the full paths list {classpath:?}",
        in_file(.file),
        .path.display()
    )]
    MissingResourcePath {
        file: Option<PathBuf>,
        path: PathBuf,
        classpath: Vec<String>,
    },

    #[error("{0} is immutable and cannot be changed")]
    ImmutableState(&'static str),

    #[error("Platform \"{0}\" is not registered")]
    PlatformNotRegistered(String),

    #[error("Duplicate platform id \"{id}\"{}", in_file(.file))]
    DuplicatePlatformId { id: String, file: Option<PathBuf> },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtensionError {
    pub(crate) fn format(file: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            file,
            message: message.into(),
        }
    }

    /// Whether this error means "the expected file or folder is absent".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FolderNotFound(_) | Self::FileNotFound { .. } | Self::PlatformNotRegistered(_)
        )
    }
}

/// Result alias for extension operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_includes_file() {
        let error = ExtensionError::format(Some(PathBuf::from("/ext/extension.json")), "bad tags");
        assert_eq!(error.to_string(), "Invalid JSON /ext/extension.json: bad tags");

        let error = ExtensionError::format(None, "bad tags");
        assert_eq!(error.to_string(), "Invalid JSON: bad tags");
    }

    #[test]
    fn test_missing_resource_path_is_not_a_not_found_error() {
        let error = ExtensionError::MissingResourcePath {
            file: None,
            path: PathBuf::from("/opt/lib/a.jar"),
            classpath: vec!["lib/a.jar".to_string()],
        };
        assert!(!error.is_not_found());
        assert!(error.to_string().contains("/opt/lib/a.jar"));
        assert!(error.to_string().contains("lib/a.jar"));
    }
}
