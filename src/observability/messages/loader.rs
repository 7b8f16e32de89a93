// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the worker loader and executor specification loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Worker prototype registered (or replaced) in a loader.
///
/// # Log Level
/// `debug!` - Per-item event
///
/// # Example
/// ```
/// use the_chainworks::observability::messages::loader::WorkerRegistered;
///
/// let msg = WorkerRegistered {
///     worker_id: "gaussian-blur",
///     replaced: true,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct WorkerRegistered<'a> {
    pub worker_id: &'a str,
    pub replaced: bool,
}

impl Display for WorkerRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.replaced {
            write!(f, "Replaced registered worker: {}", self.worker_id)
        } else {
            write!(f, "Registered worker: {}", self.worker_id)
        }
    }
}

impl StructuredLog for WorkerRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            worker_id = self.worker_id,
            replaced = self.replaced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            worker_id = self.worker_id,
            replaced = self.replaced,
        )
    }
}

/// Worker prototype removed from a loader.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct WorkerRemoved<'a> {
    pub worker_id: &'a str,
}

impl Display for WorkerRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Removed worker: {}", self.worker_id)
    }
}

impl StructuredLog for WorkerRemoved<'_> {
    fn log(&self) {
        tracing::debug!(worker_id = self.worker_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            worker_id = self.worker_id,
        )
    }
}

/// Private worker clone published for a caller.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct WorkerInstantiated<'a> {
    pub worker_id: &'a str,
}

impl Display for WorkerInstantiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Instantiated private copy of worker: {}", self.worker_id)
    }
}

impl StructuredLog for WorkerInstantiated<'_> {
    fn log(&self) {
        tracing::debug!(worker_id = self.worker_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            worker_id = self.worker_id,
        )
    }
}

/// Executor specifications read from a models folder.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SpecificationsLoaded<'a> {
    pub folder: &'a str,
    pub count: usize,
}

impl Display for SpecificationsLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} executor specification(s) from {}",
            self.count, self.folder
        )
    }
}

impl StructuredLog for SpecificationsLoaded<'_> {
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

/// JSON file in a models folder ignored because it is not an executor specification.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct SpecificationSkipped<'a> {
    pub file: &'a str,
}

impl Display for SpecificationSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping {}: not an executor specification", self.file)
    }
}

impl StructuredLog for SpecificationSkipped<'_> {
    fn log(&self) {
        tracing::debug!(file = self.file, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(tracing::Level::DEBUG, "span_name", name = name, file = self.file)
    }
}

/// Executor specification could not be loaded.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SpecificationLoadFailed<'a> {
    pub file: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SpecificationLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load executor specification '{}': {}",
            self.file, self.error
        )
    }
}

impl StructuredLog for SpecificationLoadFailed<'_> {
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
