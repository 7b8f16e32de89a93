// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Extension manifests and the platform registry.
//!
//! An extension is a folder holding an `extension.json` manifest. The manifest
//! declares one or more [`Platform`]s; each platform names a technology, the
//! folders holding its executor models and libraries, and a technology-specific
//! [`Configuration`]. Registered platforms are sealed and shared through
//! [`PlatformRegistry`].

pub mod consts;
mod configuration;
mod dependency;
mod folders;
mod manifest;
mod platform;
mod registry;

pub use configuration::Configuration;
pub use dependency::Dependency;
pub use folders::Folders;
pub use manifest::ExtensionManifest;
pub use platform::{make_unique_id, Platform};
pub use registry::PlatformRegistry;
