// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational messages of The Chainworks live here as
//! structs implementing `Display`, so log text is not scattered through the
//! registries and engines as string literals.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::extension` - manifest loading, discovery and platform registration
//! * `messages::loader` - worker registration and executor specification loading
//! * `messages::settings` - settings combination, splitting and smart search
//! * `messages::mapping` - mapping loading and interpretation
//! * `messages::runtime` - runtime host assembly
//!
//! # Usage
//!
//! ```rust
//! use the_chainworks::observability::messages::extension::ManifestLoaded;
//!
//! let msg = ManifestLoaded {
//!     file: "/opt/extensions/python/extension.json",
//!     platform_count: 2,
//! };
//!
//! tracing::debug!("{}", msg);
//! ```

pub mod messages;
