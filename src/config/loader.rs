// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::RuntimeError;
use crate::observability::messages::runtime::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime host configuration.
///
/// # Fields
/// * `extensions` - Where to look for extension manifests
/// * `settings` - Settings combiner preparation options
///
/// # Example
/// ```yaml
/// extensions:
///   roots: ["extensions"]
///   folders: ["/opt/chainworks/python-extension"]
///   check_resource_paths: true
/// settings:
///   smart_search: true
///   require_complete: false
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub extensions: ExtensionsConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Extension discovery options.
///
/// # Fields
/// * `roots` - Folders searched recursively for extension folders
/// * `folders` - Extension folders registered as they are
/// * `check_resource_paths` - Verify classpaths of platforms that require existing paths
#[derive(Debug, Deserialize, PartialEq)]
pub struct ExtensionsConfig {
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    #[serde(default)]
    pub folders: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub check_resource_paths: bool,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            folders: Vec::new(),
            check_resource_paths: true,
        }
    }
}

/// Settings options.
///
/// # Fields
/// * `smart_search` - Run the smart settings search after loading specifications
/// * `require_complete` - Fail when the search leaves sub-settings unresolved
#[derive(Debug, Deserialize, PartialEq)]
pub struct SettingsConfig {
    #[serde(default = "default_true")]
    pub smart_search: bool,
    #[serde(default)]
    pub require_complete: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            smart_search: true,
            require_complete: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl RuntimeConfig {
    /// Makes every relative extension path relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in self
            .extensions
            .roots
            .iter_mut()
            .chain(self.extensions.folders.iter_mut())
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load a runtime config from a YAML file.
///
/// Relative extension paths are resolved against the directory of `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RuntimeConfig, RuntimeError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cfg: RuntimeConfig =
        serde_yaml::from_str(&content).map_err(|source| RuntimeError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    cfg.resolve_paths(base);

    ConfigLoaded {
        path: &path.display().to_string(),
        root_count: cfg.extensions.roots.len(),
        folder_count: cfg.extensions.folders.len(),
    }
    .log();
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
extensions:
  roots: [extensions]
  folders: [/opt/python-extension]
settings:
  require_complete: true
"#;

        let cfg: RuntimeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.extensions.roots, vec![PathBuf::from("extensions")]);
        assert_eq!(cfg.extensions.folders, vec![PathBuf::from("/opt/python-extension")]);
        assert!(cfg.extensions.check_resource_paths);
        assert!(cfg.settings.smart_search);
        assert!(cfg.settings.require_complete);
    }

    #[test]
    fn test_defaults_for_empty_sections() {
        struct TestCase {
            name: &'static str,
            yaml: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "empty document",
                yaml: "{}",
            },
            TestCase {
                name: "empty sections",
                yaml: "extensions: {}\nsettings: {}\n",
            },
        ];

        for tc in test_cases {
            let cfg: RuntimeConfig = serde_yaml::from_str(tc.yaml).unwrap();
            assert_eq!(cfg, RuntimeConfig::default(), "case: {}", tc.name);
        }
    }

    #[test]
    fn test_load_config_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("runtime.yaml");
        std::fs::write(
            &file,
            "extensions:\n  roots: [extensions]\n  folders: [/abs/ext]\n",
        )
        .unwrap();

        let cfg = load_config(&file).unwrap();
        assert_eq!(cfg.extensions.roots, vec![dir.path().join("extensions")]);
        assert_eq!(cfg.extensions.folders, vec![PathBuf::from("/abs/ext")]);
    }

    #[test]
    fn test_load_config_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(load_config(&missing), Err(RuntimeError::ConfigIo { .. })));

        let invalid = dir.path().join("invalid.yaml");
        std::fs::write(&invalid, "extensions:\n  roots: 12\n").unwrap();
        let error = load_config(&invalid).unwrap_err();
        assert!(matches!(error, RuntimeError::ConfigFormat { .. }));
        assert!(error.to_string().contains("invalid.yaml"));
    }
}
