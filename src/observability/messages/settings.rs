// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for settings combination and the smart settings search.
//!
//! This module contains message types for logging events related to:
//! * Combiner creation
//! * Combining and splitting timing
//! * Smart search results, incompleteness and duplicates
//! * Reference cycles between settings specifications

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Settings combiner built from a settings specification.
///
/// # Log Level
/// `debug!` - Per-item event
pub struct SettingsCombinerCreated<'a> {
    pub settings_id: &'a str,
    pub settings_name: &'a str,
    pub control_count: usize,
}

impl Display for SettingsCombinerCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created settings combiner \"{}\" ({}) with {} control(s)",
            self.settings_name, self.settings_id, self.control_count
        )
    }
}

impl StructuredLog for SettingsCombinerCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            settings_id = self.settings_id,
            settings_name = self.settings_name,
            control_count = self.control_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            settings_id = self.settings_id,
            settings_name = self.settings_name,
        )
    }
}

/// Settings document combined with parameters.
///
/// # Log Level
/// `debug!` - Timing detail
///
/// # Example
/// ```
/// use std::time::Duration;
/// use the_chainworks::observability::messages::settings::SettingsCombined;
///
/// let msg = SettingsCombined {
///     settings_name: "Blur settings",
///     duration: Duration::from_micros(250),
/// };
///
/// assert_eq!(msg.to_string(), "Combining settings \"Blur settings\": 0.250 ms");
/// ```
pub struct SettingsCombined<'a> {
    pub settings_name: &'a str,
    pub duration: Duration,
}

impl Display for SettingsCombined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Combining settings \"{}\": {:.3} ms",
            self.settings_name,
            self.duration.as_secs_f64() * 1000.0
        )
    }
}

impl StructuredLog for SettingsCombined<'_> {
    fn log(&self) {
        tracing::debug!(
            settings_name = self.settings_name,
            duration_ms = self.duration.as_secs_f64() * 1000.0,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            settings_name = self.settings_name,
        )
    }
}

/// Settings document split back into parameters.
///
/// # Log Level
/// `debug!` - Timing detail
pub struct SettingsSplit<'a> {
    pub settings_name: &'a str,
    pub duration: Duration,
}

impl Display for SettingsSplit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Splitting settings \"{}\": {:.3} ms",
            self.settings_name,
            self.duration.as_secs_f64() * 1000.0
        )
    }
}

impl StructuredLog for SettingsSplit<'_> {
    fn log(&self) {
        tracing::debug!(
            settings_name = self.settings_name,
            duration_ms = self.duration.as_secs_f64() * 1000.0,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            settings_name = self.settings_name,
        )
    }
}

/// Smart settings search finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SmartSearchCompleted {
    pub settings_count: usize,
    pub unresolved_count: usize,
    pub has_duplicates: bool,
}

impl Display for SmartSearchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Smart settings search found {} settings specification(s), {} unresolved reference(s)",
            self.settings_count, self.unresolved_count
        )
    }
}

impl StructuredLog for SmartSearchCompleted {
    fn log(&self) {
        tracing::info!(
            settings_count = self.settings_count,
            unresolved_count = self.unresolved_count,
            has_duplicates = self.has_duplicates,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            settings_count = self.settings_count,
            unresolved_count = self.unresolved_count,
        )
    }
}

/// Some sub-settings references could not be resolved.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct SmartSearchIncomplete<'a> {
    pub unresolved: &'a [String],
}

impl Display for SmartSearchIncomplete<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Smart settings search is incomplete, unresolved sub-settings: {}",
            self.unresolved.join(", ")
        )
    }
}

impl StructuredLog for SmartSearchIncomplete<'_> {
    fn log(&self) {
        tracing::warn!(
            unresolved = self.unresolved.join(", "),
            unresolved_count = self.unresolved.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "span_name",
            name = name,
            unresolved_count = self.unresolved.len(),
        )
    }
}

/// Two different settings specifications share one settings name.
///
/// # Log Level
/// `warn!` - Potential issue
pub struct DuplicateSettingsName<'a> {
    pub settings_name: &'a str,
    pub first_id: &'a str,
    pub second_id: &'a str,
}

impl Display for DuplicateSettingsName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Settings name \"{}\" is used by both '{}' and '{}'",
            self.settings_name, self.first_id, self.second_id
        )
    }
}

impl StructuredLog for DuplicateSettingsName<'_> {
    fn log(&self) {
        tracing::warn!(
            settings_name = self.settings_name,
            first_id = self.first_id,
            second_id = self.second_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "span_name",
            name = name,
            settings_name = self.settings_name,
        )
    }
}

/// Sub-settings references form a cycle.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SettingsCycleDetected<'a> {
    pub cycle: &'a [String],
}

impl Display for SettingsCycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Settings reference cycle detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for SettingsCycleDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            cycle = self.cycle.join(" -> "),
        )
    }
}
