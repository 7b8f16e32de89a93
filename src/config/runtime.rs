// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::RuntimeConfig;
use crate::errors::RuntimeError;
use crate::extension::{ExtensionManifest, PlatformRegistry};
use crate::loader::{load_specifications, ExecutorSpecification, WorkerLoader};
use crate::mappings::{load_mappings, MappingLoader};
use crate::observability::messages::runtime::RuntimeReady;
use crate::observability::messages::StructuredLog;
use crate::settings::{CombinerLoader, SettingsCombiner, SmartSearchSettings};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Registries filled from the configured extensions.
///
/// * `platforms` - Every platform of every registered manifest, sealed
/// * `specifications` - Executor specifications read from the platforms' models folders
/// * `combiners` - One settings combiner per settings specification
/// * `mappings` - Mapping workers read from the same models folders
/// * `settings_search` - Result of the smart settings search, when enabled
pub struct Runtime {
    pub platforms: PlatformRegistry,
    pub specifications: Arc<WorkerLoader<ExecutorSpecification>>,
    pub combiners: CombinerLoader,
    pub mappings: MappingLoader,
    pub settings_search: Option<SmartSearchSettings>,
}

/// Runtime builder - fills the registries from configuration.
///
/// Building performs blocking file system I/O; async callers should run it
/// on a blocking thread.
///
/// # Examples
///
/// ```
/// use the_chainworks::config::{RuntimeBuilder, RuntimeConfig};
///
/// let runtime = RuntimeBuilder::from_config(&RuntimeConfig::default()).unwrap();
///
/// assert!(runtime.platforms.is_empty());
/// assert!(runtime.specifications.is_empty());
/// assert!(runtime.settings_search.unwrap().is_complete());
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the runtime from configuration.
    ///
    /// Steps, each failing the whole build on error:
    /// 1. collect extension folders: explicit folders first, then every
    ///    folder discovered under the roots, skipping repeats
    /// 2. register each folder's manifest
    /// 3. check resource paths, when configured
    /// 4. load executor specifications and mappings from every models folder
    /// 5. create settings combiners
    /// 6. run the smart settings search, when configured
    pub fn from_config(cfg: &RuntimeConfig) -> Result<Runtime, RuntimeError> {
        let start = Instant::now();

        let platforms = PlatformRegistry::new();
        for folder in Self::extension_folders(cfg)? {
            let manifest = ExtensionManifest::load_from_folder(&folder)?;
            platforms.register_manifest(manifest)?;
        }
        if cfg.extensions.check_resource_paths {
            platforms.check_resource_paths()?;
        }

        let specifications = Arc::new(WorkerLoader::new());
        let mappings = MappingLoader::new();
        for folder in platforms.models_folders()? {
            load_specifications(&folder, &specifications)?;
            load_mappings(&folder, &mappings)?;
        }

        let combiners = CombinerLoader::new();
        let combiner_count = SettingsCombiner::register_all(&specifications, &combiners)?;

        let settings_search = if cfg.settings.smart_search {
            let mut search = SmartSearchSettings::for_loader(Arc::clone(&specifications));
            search.process()?;
            if cfg.settings.require_complete && !search.is_complete() {
                let unresolved: Vec<String> = search.unresolved()?.iter().map(|r| r.to_string()).collect();
                return Err(RuntimeError::IncompleteSettings { unresolved });
            }
            Some(search)
        } else {
            None
        };

        RuntimeReady {
            platform_count: platforms.len(),
            specification_count: specifications.len(),
            combiner_count,
            mapping_count: mappings.len(),
            duration: start.elapsed(),
        }
        .log();

        Ok(Runtime {
            platforms,
            specifications,
            combiners,
            mappings,
            settings_search,
        })
    }

    fn extension_folders(cfg: &RuntimeConfig) -> Result<Vec<PathBuf>, RuntimeError> {
        let mut folders = cfg.extensions.folders.clone();
        for root in &cfg.extensions.roots {
            folders.extend(ExtensionManifest::discover_extension_folders(root)?);
        }
        let mut seen = HashSet::new();
        folders.retain(|folder| seen.insert(folder_identity(folder)));
        Ok(folders)
    }
}

/// Key under which two spellings of the same extension folder compare equal.
///
/// Existing folders are canonicalized; a missing folder keeps its lexical
/// absolute form so that loading it still reports it as not found.
fn folder_identity(folder: &Path) -> PathBuf {
    fs::canonicalize(folder)
        .or_else(|_| std::path::absolute(folder))
        .unwrap_or_else(|_| folder.to_path_buf())
}
