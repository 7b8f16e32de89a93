// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ExtensionManifest, Platform};
use crate::errors::{ExtensionError, ExtensionResult};
use crate::observability::messages::extension::{
    DuplicatePlatformId, PlatformRegistered, ResourcePathsChecked,
};
use crate::observability::messages::StructuredLog;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    ordered: Vec<Arc<Platform>>,
    by_id: HashMap<String, usize>,
}

/// Thread-safe index of installed platforms.
///
/// Registration seals every platform ([`Platform::set_immutable`]) before it
/// becomes visible, so all readers observe a finished, unchangeable platform.
/// Lookups take a shared read lock; registration is rare and takes the write
/// lock.
///
/// # Examples
///
/// ```
/// use the_chainworks::extension::{ExtensionManifest, PlatformRegistry};
///
/// let manifest: ExtensionManifest = r#"{
///     "app": "executors-extension",
///     "platforms": [{"id": "core", "technology": "JVM"}]
/// }"#
/// .parse()
/// .unwrap();
///
/// let registry = PlatformRegistry::new();
/// registry.register_manifest(manifest).unwrap();
///
/// let core = registry.require("core").unwrap();
/// assert!(core.is_immutable());
/// assert_eq!(registry.built_in().len(), 1);
/// ```
#[derive(Default)]
pub struct PlatformRegistry {
    inner: RwLock<Inner>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers all platforms of a manifest, or none of them.
    ///
    /// # Errors
    /// [`ExtensionError::DuplicatePlatformId`] when an id is already registered
    /// or repeats inside the manifest.
    pub fn register_manifest(&self, manifest: ExtensionManifest) -> ExtensionResult<Vec<Arc<Platform>>> {
        let mut inner = self.inner.write();
        let platforms = manifest.into_platforms();
        for (index, platform) in platforms.iter().enumerate() {
            let repeated = platforms[..index].iter().any(|p| p.id() == platform.id());
            if repeated || inner.by_id.contains_key(platform.id()) {
                return Err(duplicate(platform));
            }
        }
        Ok(platforms
            .into_iter()
            .map(|platform| insert(&mut inner, platform))
            .collect())
    }

    pub fn register_platform(&self, platform: Platform) -> ExtensionResult<Arc<Platform>> {
        let mut inner = self.inner.write();
        if inner.by_id.contains_key(platform.id()) {
            return Err(duplicate(&platform));
        }
        Ok(insert(&mut inner, platform))
    }

    pub fn get(&self, id: &str) -> Option<Arc<Platform>> {
        let inner = self.inner.read();
        inner.by_id.get(id).map(|&index| Arc::clone(&inner.ordered[index]))
    }

    pub fn require(&self, id: &str) -> ExtensionResult<Arc<Platform>> {
        self.get(id)
            .ok_or_else(|| ExtensionError::PlatformNotRegistered(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().by_id.contains_key(id)
    }

    /// All platforms in registration order.
    pub fn platforms(&self) -> Vec<Arc<Platform>> {
        self.inner.read().ordered.clone()
    }

    /// Platforms of one technology, compared case-insensitively.
    pub fn by_technology(&self, technology: &str) -> Vec<Arc<Platform>> {
        self.filtered(|p| p.technology().eq_ignore_ascii_case(technology))
    }

    pub fn built_in(&self) -> Vec<Arc<Platform>> {
        self.filtered(|p| p.is_built_in())
    }

    pub fn with_models(&self) -> Vec<Arc<Platform>> {
        self.filtered(|p| p.has_models())
    }

    /// Resolved models folders of every platform that declares one.
    pub fn models_folders(&self) -> ExtensionResult<Vec<PathBuf>> {
        self.with_models()
            .iter()
            .map(|platform| platform.models_folder())
            .collect()
    }

    /// Runs [`Platform::check_resource_paths_if_required`] on every platform.
    pub fn check_resource_paths(&self) -> ExtensionResult<()> {
        for platform in self.platforms() {
            platform.check_resource_paths_if_required()?;
            if platform.configuration().require_existing_paths() {
                ResourcePathsChecked {
                    platform_id: platform.id(),
                    path_count: platform.configuration().classpath().len(),
                }
                .log();
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered(&self, predicate: impl Fn(&Platform) -> bool) -> Vec<Arc<Platform>> {
        self.inner
            .read()
            .ordered
            .iter()
            .filter(|platform| predicate(platform))
            .cloned()
            .collect()
    }
}

fn insert(inner: &mut Inner, mut platform: Platform) -> Arc<Platform> {
    platform.set_immutable();
    PlatformRegistered {
        platform_id: platform.id(),
        technology: platform.technology(),
        built_in: platform.is_built_in(),
    }
    .log();
    let platform = Arc::new(platform);
    inner
        .by_id
        .insert(platform.id().to_string(), inner.ordered.len());
    inner.ordered.push(Arc::clone(&platform));
    platform
}

fn duplicate(platform: &Platform) -> ExtensionError {
    DuplicatePlatformId {
        platform_id: platform.id(),
    }
    .log();
    ExtensionError::DuplicatePlatformId {
        id: platform.id().to_string(),
        file: platform.file().map(PathBuf::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;
    use tempfile::TempDir;

    fn manifest(platforms: serde_json::Value) -> ExtensionManifest {
        let json = json!({"app": "executors-extension", "platforms": platforms});
        ExtensionManifest::parse(&json, None).unwrap()
    }

    #[test]
    fn test_register_seals_and_indexes() {
        let registry = PlatformRegistry::new();
        let registered = registry
            .register_manifest(manifest(json!([
                {"id": "core", "technology": "jvm", "folders": {"models": "/opt/core/models"}},
                {"id": "py", "technology": "Python"},
                {"id": "js", "technology": "javascript", "folders": {"models": "/opt/js/models"}}
            ])))
            .unwrap();

        assert_eq!(registered.len(), 3);
        assert!(registered.iter().all(|p| p.is_immutable() && p.folders().is_immutable()));
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("py"));

        let ids: Vec<String> = registry.platforms().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["core", "py", "js"]);
        assert_eq!(registry.by_technology("python").len(), 1);
        assert_eq!(registry.built_in()[0].id(), "core");
        assert_eq!(
            registry.models_folders().unwrap(),
            vec![PathBuf::from("/opt/core/models"), PathBuf::from("/opt/js/models")]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected_atomically() {
        let registry = PlatformRegistry::new();
        registry
            .register_manifest(manifest(json!([{"id": "core", "technology": "jvm"}])))
            .unwrap();

        let error = registry
            .register_manifest(manifest(json!([
                {"id": "fresh", "technology": "jvm"},
                {"id": "core", "technology": "jvm"}
            ])))
            .unwrap_err();
        assert!(matches!(error, ExtensionError::DuplicatePlatformId { ref id, .. } if id == "core"));
        assert!(!registry.contains("fresh"));

        let error = registry
            .register_manifest(manifest(json!([
                {"id": "twin", "technology": "jvm"},
                {"id": "twin", "technology": "python"}
            ])))
            .unwrap_err();
        assert!(matches!(error, ExtensionError::DuplicatePlatformId { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_unknown_platform() {
        let registry = PlatformRegistry::new();
        assert!(registry.is_empty());
        let error = registry.require("missing").unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Platform \"missing\" is not registered");
    }

    #[test]
    fn test_concurrent_readers_see_sealed_platforms() {
        let registry = Arc::new(PlatformRegistry::new());
        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..50 {
                    let mut platform = Platform::new("jvm").unwrap();
                    platform.set_id(format!("p{i}")).unwrap();
                    registry.register_platform(platform).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..50 {
                        assert!(registry.platforms().iter().all(|p| p.is_immutable()));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        readers.into_iter().for_each(|r| r.join().unwrap());
        assert_eq!(registry.len(), 50);
    }

    #[test]
    fn test_check_resource_paths() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("extension.json");
        let json = json!({
            "app": "executors-extension",
            "platforms": [{
                "id": "core",
                "technology": "jvm",
                "configuration": {"classpath": ["core.jar"], "require_existing_paths": true}
            }]
        });
        let registry = PlatformRegistry::new();
        registry
            .register_manifest(ExtensionManifest::parse(&json, Some(&file)).unwrap())
            .unwrap();

        assert!(matches!(
            registry.check_resource_paths(),
            Err(ExtensionError::MissingResourcePath { .. })
        ));

        std::fs::write(dir.path().join("core.jar"), b"").unwrap();
        assert!(registry.check_resource_paths().is_ok());
    }
}
