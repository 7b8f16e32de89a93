// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Extension manifest (`extension.json`) reading, discovery and writing.

use super::consts::{APP_NAME, CURRENT_VERSION, DEFAULT_EXTENSION_FILE_NAME};
use super::Platform;
use crate::errors::{ExtensionError, ExtensionResult};
use crate::observability::messages::extension::{
    ExtensionFoldersDiscovered, ManifestLoadFailed, ManifestLoaded, ManifestSkipped,
};
use crate::observability::messages::StructuredLog;
use crate::utils::json::{opt_str, req_objects};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

/// Parsed extension manifest: a version and an ordered list of platforms.
///
/// # Examples
///
/// ```
/// use the_chainworks::extension::ExtensionManifest;
///
/// let manifest: ExtensionManifest = r#"{
///     "app": "executors-extension",
///     "platforms": [{"id": "py", "technology": "python", "folders": {"models": "/opt/py/models"}}]
/// }"#
/// .parse()
/// .unwrap();
///
/// assert_eq!(manifest.version(), "1.0");
/// assert_eq!(manifest.platforms()[0].id(), "py");
/// ```
#[derive(Debug, Clone)]
pub struct ExtensionManifest {
    file: Option<PathBuf>,
    version: String,
    platforms: Vec<Platform>,
}

impl Default for ExtensionManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionManifest {
    pub fn new() -> Self {
        Self {
            file: None,
            version: CURRENT_VERSION.to_string(),
            platforms: Vec::new(),
        }
    }

    /// Parses a manifest document.
    ///
    /// `file` is the manifest location; it becomes the root for relative
    /// folder names and appears in error messages.
    ///
    /// # Errors
    /// [`ExtensionError::Format`] when the `"app"` marker is missing or wrong,
    /// or when any platform is malformed.
    pub fn parse(json: &Value, file: Option<&Path>) -> ExtensionResult<Self> {
        let owned_file = file.map(Path::to_path_buf);
        let object = match json {
            Value::Object(object) if is_app_marker(object) => object,
            _ => {
                return Err(ExtensionError::format(
                    owned_file,
                    format!("not an extension manifest: no \"app\":\"{}\" element", APP_NAME),
                ))
            }
        };
        let version = opt_str(object, "version")
            .map_err(|e| ExtensionError::format(owned_file.clone(), e.0))?
            .unwrap_or(CURRENT_VERSION)
            .to_string();
        let platforms = req_objects(object, "platforms")
            .map_err(|e| ExtensionError::format(owned_file.clone(), e.0))?
            .into_iter()
            .map(|platform| Platform::parse(platform, file))
            .collect::<ExtensionResult<Vec<_>>>()?;
        Ok(Self {
            file: owned_file,
            version,
            platforms,
        })
    }

    /// Like [`parse`](Self::parse), but `Ok(None)` for documents without the
    /// manifest marker. Other format errors still propagate.
    pub fn parse_if_recognized(json: &Value, file: Option<&Path>) -> ExtensionResult<Option<Self>> {
        if !Self::is_extension_document(json) {
            return Ok(None);
        }
        Self::parse(json, file).map(Some)
    }

    pub fn load_from_file(path: &Path) -> ExtensionResult<Self> {
        let json = read_json(path)?;
        let manifest = Self::parse(&json, Some(path)).inspect_err(|e| {
            ManifestLoadFailed {
                file: &path.display().to_string(),
                error: e,
            }
            .log()
        })?;
        ManifestLoaded {
            file: &path.display().to_string(),
            platform_count: manifest.platforms.len(),
        }
        .log();
        Ok(manifest)
    }

    /// Reads a manifest file, returning `Ok(None)` when the JSON is not a manifest.
    pub fn load_from_file_if_recognized(path: &Path) -> ExtensionResult<Option<Self>> {
        let json = read_json(path)?;
        if !Self::is_extension_document(&json) {
            ManifestSkipped {
                file: &path.display().to_string(),
            }
            .log();
            return Ok(None);
        }
        Self::parse(&json, Some(path)).map(Some)
    }

    /// Reads `extension.json` from an extension folder.
    ///
    /// # Errors
    /// [`ExtensionError::FolderNotFound`] when `folder` is not a directory,
    /// [`ExtensionError::FileNotFound`] when it has no manifest.
    pub fn load_from_folder(folder: &Path) -> ExtensionResult<Self> {
        if !folder.is_dir() {
            return Err(ExtensionError::FolderNotFound(folder.to_path_buf()));
        }
        let file = Self::default_extension_file(folder);
        if !file.exists() {
            return Err(ExtensionError::FileNotFound {
                file,
                folder: folder.to_path_buf(),
            });
        }
        Self::load_from_file(&file)
    }

    /// Every folder under `root` (including `root`) that directly contains
    /// `extension.json`, sorted by path.
    ///
    /// Symbolic links are not followed into; a linked folder is still
    /// reported when it contains a manifest itself.
    pub fn discover_extension_folders(root: &Path) -> ExtensionResult<Vec<PathBuf>> {
        let mut folders = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| ExtensionError::Io {
                path: e.path().unwrap_or(root).to_path_buf(),
                source: e.into(),
            })?;
            if Self::is_extension_folder(entry.path()) {
                folders.push(entry.into_path());
            }
        }
        folders.sort();
        ExtensionFoldersDiscovered {
            root: &root.display().to_string(),
            folder_count: folders.len(),
        }
        .log();
        Ok(folders)
    }

    pub fn is_extension_folder(folder: &Path) -> bool {
        folder.is_dir() && Self::default_extension_file(folder).exists()
    }

    pub fn is_extension_document(json: &Value) -> bool {
        json.as_object().is_some_and(is_app_marker)
    }

    /// Absolute path of the manifest file inside `folder`.
    pub fn default_extension_file(folder: &Path) -> PathBuf {
        let file = folder.join(DEFAULT_EXTENSION_FILE_NAME);
        std::path::absolute(&file).unwrap_or(file)
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn set_platforms(&mut self, platforms: Vec<Platform>) -> &mut Self {
        self.platforms = platforms;
        self
    }

    pub fn into_platforms(self) -> Vec<Platform> {
        self.platforms
    }

    pub fn to_json(&self) -> Value {
        let mut result = Map::new();
        result.insert("app".to_string(), Value::String(APP_NAME.to_string()));
        result.insert("version".to_string(), Value::String(self.version.clone()));
        let platforms = self
            .platforms
            .iter()
            .map(|platform| Value::Object(platform.to_json()))
            .collect();
        result.insert("platforms".to_string(), Value::Array(platforms));
        Value::Object(result)
    }

    pub fn to_pretty_string(&self) -> String {
        crate::utils::to_pretty_string(&self.to_json())
    }

    pub fn write(&self, path: &Path) -> ExtensionResult<()> {
        std::fs::write(path, self.to_pretty_string()).map_err(|source| ExtensionError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FromStr for ExtensionManifest {
    type Err = ExtensionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let json: Value =
            serde_json::from_str(text).map_err(|source| ExtensionError::Json { file: None, source })?;
        Self::parse(&json, None)
    }
}

fn is_app_marker(object: &Map<String, Value>) -> bool {
    object.get("app").and_then(Value::as_str) == Some(APP_NAME)
}

fn read_json(path: &Path) -> ExtensionResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| ExtensionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ExtensionError::Json {
        file: Some(path.to_path_buf()),
        source,
    })
}
