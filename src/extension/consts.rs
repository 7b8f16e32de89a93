// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Value of the `"app"` marker that identifies an extension manifest
pub const APP_NAME: &str = "executors-extension";
/// Manifest version written by [`ExtensionManifest::new`](super::ExtensionManifest::new)
pub const CURRENT_VERSION: &str = "1.0";
/// Manifest file looked up inside every extension folder
pub const DEFAULT_EXTENSION_FILE_NAME: &str = "extension.json";
/// Technology of platforms that run inside the host process
pub const JVM_TECHNOLOGY: &str = "jvm";
/// Platform name used when the manifest omits one
pub const DEFAULT_NAME: &str = "Unnamed";
/// Prefix of generated platform ids
pub const DYNAMIC_ID_PREFIX: &str = "_dynamic_id_";
/// Suffix of generated platform ids; keeps them apart from hand-written ones
pub const DYNAMIC_ID_SUFFIX: &str = "--3f8b1c52-7d4e-4a9b-b6c1-0e2d5f9a8c47";
