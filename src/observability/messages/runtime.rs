// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for runtime host assembly.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Runtime configuration file read.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub root_count: usize,
    pub folder_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded runtime config {} ({} extension root(s), {} extension folder(s))",
            self.path, self.root_count, self.folder_count
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            root_count = self.root_count,
            folder_count = self.folder_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(tracing::Level::INFO, "span_name", name = name, path = self.path)
    }
}

/// Runtime assembled and ready to serve chains.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use std::time::Duration;
/// use the_chainworks::observability::messages::runtime::RuntimeReady;
///
/// let msg = RuntimeReady {
///     platform_count: 2,
///     specification_count: 14,
///     combiner_count: 3,
///     mapping_count: 1,
///     duration: Duration::from_millis(12),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RuntimeReady {
    pub platform_count: usize,
    pub specification_count: usize,
    pub combiner_count: usize,
    pub mapping_count: usize,
    pub duration: Duration,
}

impl Display for RuntimeReady {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Runtime ready in {:?}: {} platform(s), {} executor specification(s), {} settings combiner(s), {} mapping(s)",
            self.duration,
            self.platform_count,
            self.specification_count,
            self.combiner_count,
            self.mapping_count
        )
    }
}

impl StructuredLog for RuntimeReady {
    fn log(&self) {
        tracing::info!(
            platform_count = self.platform_count,
            specification_count = self.specification_count,
            combiner_count = self.combiner_count,
            mapping_count = self.mapping_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            platform_count = self.platform_count,
            specification_count = self.specification_count,
        )
    }
}
