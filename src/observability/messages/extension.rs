// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for extension manifests and the platform registry.
//!
//! This module contains message types for logging events related to:
//! * Manifest loading and rejection
//! * Extension folder discovery
//! * Platform registration and resource path checks

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Extension manifest read and parsed.
///
/// # Log Level
/// `debug!` - Per-item event
///
/// # Example
/// ```
/// use the_chainworks::observability::messages::extension::ManifestLoaded;
///
/// let msg = ManifestLoaded {
///     file: "/opt/extensions/jvm/extension.json",
///     platform_count: 1,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ManifestLoaded<'a> {
    pub file: &'a str,
    pub platform_count: usize,
}

impl Display for ManifestLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded extension manifest {} with {} platform(s)",
            self.file, self.platform_count
        )
    }
}

impl StructuredLog for ManifestLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            file = self.file,
            platform_count = self.platform_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            file = self.file,
            platform_count = self.platform_count,
        )
    }
}

/// JSON file ignored because it is not an extension manifest.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct ManifestSkipped<'a> {
    pub file: &'a str,
}

impl Display for ManifestSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping {}: not an extension manifest", self.file)
    }
}

impl StructuredLog for ManifestSkipped<'_> {
    fn log(&self) {
        tracing::debug!(file = self.file, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(tracing::Level::DEBUG, "span_name", name = name, file = self.file)
    }
}

/// Extension manifest could not be loaded.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ManifestLoadFailed<'a> {
    pub file: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ManifestLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load extension manifest '{}': {}",
            self.file, self.error
        )
    }
}

impl StructuredLog for ManifestLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(
            file = self.file,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            file = self.file,
            error = %self.error,
        )
    }
}

/// Extension folders found under a root.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_chainworks::observability::messages::extension::ExtensionFoldersDiscovered;
///
/// let msg = ExtensionFoldersDiscovered {
///     root: "/opt/extensions",
///     folder_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExtensionFoldersDiscovered<'a> {
    pub root: &'a str,
    pub folder_count: usize,
}

impl Display for ExtensionFoldersDiscovered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discovered {} extension folder(s) under {}",
            self.folder_count, self.root
        )
    }
}

impl StructuredLog for ExtensionFoldersDiscovered<'_> {
    fn log(&self) {
        tracing::info!(
            root = self.root,
            folder_count = self.folder_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            root = self.root,
            folder_count = self.folder_count,
        )
    }
}

/// Platform sealed and added to the registry.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct PlatformRegistered<'a> {
    pub platform_id: &'a str,
    pub technology: &'a str,
    pub built_in: bool,
}

impl Display for PlatformRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered platform '{}' (technology: {}{})",
            self.platform_id,
            self.technology,
            if self.built_in { ", built-in" } else { "" }
        )
    }
}

impl StructuredLog for PlatformRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            platform_id = self.platform_id,
            technology = self.technology,
            built_in = self.built_in,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            platform_id = self.platform_id,
            technology = self.technology,
            built_in = self.built_in,
        )
    }
}

/// A second platform with an already registered id was rejected.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicatePlatformId<'a> {
    pub platform_id: &'a str,
}

impl Display for DuplicatePlatformId<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate platform ID: '{}'", self.platform_id)
    }
}

impl StructuredLog for DuplicatePlatformId<'_> {
    fn log(&self) {
        tracing::error!(platform_id = self.platform_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            platform_id = self.platform_id,
        )
    }
}

/// Resource paths of a platform verified on disk.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct ResourcePathsChecked<'a> {
    pub platform_id: &'a str,
    pub path_count: usize,
}

impl Display for ResourcePathsChecked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Checked {} resource path(s) of platform '{}'",
            self.path_count, self.platform_id
        )
    }
}

impl StructuredLog for ResourcePathsChecked<'_> {
    fn log(&self) {
        tracing::debug!(
            platform_id = self.platform_id,
            path_count = self.path_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            platform_id = self.platform_id,
            path_count = self.path_count,
        )
    }
}
