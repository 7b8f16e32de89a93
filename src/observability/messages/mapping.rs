// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for mapping specifications and the mapping interpreter.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Mapping specifications read from a models folder.
///
/// # Log Level
/// `info!` - Important operational event
pub struct MappingsLoaded<'a> {
    pub folder: &'a str,
    pub count: usize,
}

impl Display for MappingsLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded {} mapping(s) from {}", self.count, self.folder)
    }
}

impl StructuredLog for MappingsLoaded<'_> {
    fn log(&self) {
        tracing::info!(folder = self.folder, count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            folder = self.folder,
            count = self.count,
        )
    }
}

/// Mapping could not be loaded.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct MappingLoadFailed<'a> {
    pub file: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for MappingLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to load mapping '{}': {}", self.file, self.error)
    }
}

impl StructuredLog for MappingLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(file = self.file, error = %self.error, "{}", self);
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

/// Mapping document built from parameters.
///
/// # Log Level
/// `debug!` - Timing detail; the document itself at `trace!`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use the_chainworks::observability::messages::mapping::MappingCreated;
///
/// let msg = MappingCreated {
///     mapping_name: "Channel weights",
///     duration: Duration::from_micros(1500),
///     mapping: "{}",
/// };
///
/// assert_eq!(msg.to_string(), "Making mapping \"Channel weights\": 1.500 ms");
/// ```
pub struct MappingCreated<'a> {
    pub mapping_name: &'a str,
    pub duration: Duration,
    pub mapping: &'a str,
}

impl Display for MappingCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Making mapping \"{}\": {:.3} ms",
            self.mapping_name,
            self.duration.as_secs_f64() * 1000.0
        )
    }
}

impl StructuredLog for MappingCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            mapping_name = self.mapping_name,
            duration_ms = self.duration.as_secs_f64() * 1000.0,
            "{}", self
        );
        tracing::trace!(mapping_name = self.mapping_name, "{}\n{}", self, self.mapping);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            mapping_name = self.mapping_name,
        )
    }
}
