// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every message implements `Display` for the human-readable line and
//! [`StructuredLog`] for emitting the same event with typed fields.
//!
//! # Organization
//!
//! * `extension` - manifests, extension folders, platform registry
//! * `loader` - worker loader and executor specifications
//! * `mapping` - mapping specifications and the mapping interpreter
//! * `settings` - settings combiners and the smart settings search
//! * `runtime` - runtime host lifecycle
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_chainworks::observability::messages::{loader::WorkerRegistered, StructuredLog};
//!
//! WorkerRegistered {
//!     worker_id: "blur",
//!     replaced: false,
//! }
//! .log();
//! ```

use tracing::Span;

pub mod extension;
pub mod loader;
pub mod mapping;
pub mod runtime;
pub mod settings;

/// Emits a message as a structured tracing event.
///
/// `log` writes the event at the level documented on the message type;
/// `span` opens a span carrying the same fields, for work that belongs to
/// the event.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
