// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sub-folder layout of a platform.
//!
//! A platform declares up to four named sub-folders. Each declared name is
//! either absolute or relative to the platform root, which is the directory
//! containing the manifest file. The root is always stored as an absolute
//! path, so resolved folders do not depend on the current directory later.

use crate::errors::{ExtensionError, ExtensionResult};
use crate::utils::json::{opt_str, FieldResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const MODELS: &str = "models";
const MODULES: &str = "modules";
const LIBRARIES: &str = "libraries";
const RESOURCES: &str = "resources";

#[derive(Debug, Clone, Default)]
pub struct Folders {
    models: Option<String>,
    modules: Option<String>,
    libraries: Option<String>,
    resources: Option<String>,
    root: Option<PathBuf>,
    immutable: bool,
}

impl Folders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(absolute_root(root.into())),
            ..Self::default()
        }
    }

    pub(crate) fn rooted(root: Option<PathBuf>) -> Self {
        Self {
            root: root.map(absolute_root),
            ..Self::default()
        }
    }

    /// Reads the `"folders"` object of a platform. Empty names are rejected.
    pub(crate) fn parse(object: &Map<String, Value>, root: Option<PathBuf>) -> FieldResult<Self> {
        let read = |key: &str| -> FieldResult<Option<String>> {
            match opt_str(object, key)? {
                Some("") => Err(crate::utils::FieldError(format!(
                    "\"folders\" member \"{}\" must not be empty",
                    key
                ))),
                other => Ok(other.map(str::to_string)),
            }
        };
        Ok(Self {
            models: read(MODELS)?,
            modules: read(MODULES)?,
            libraries: read(LIBRARIES)?,
            resources: read(RESOURCES)?,
            root: root.map(absolute_root),
            immutable: false,
        })
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root: Option<PathBuf>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.root = root.map(absolute_root);
        Ok(self)
    }

    pub fn models(&self) -> Option<&str> {
        self.models.as_deref()
    }

    pub fn set_models(&mut self, models: &str) -> ExtensionResult<&mut Self> {
        self.models = Some(self.checked_name(models, MODELS)?);
        Ok(self)
    }

    pub fn modules(&self) -> Option<&str> {
        self.modules.as_deref()
    }

    pub fn set_modules(&mut self, modules: &str) -> ExtensionResult<&mut Self> {
        self.modules = Some(self.checked_name(modules, MODULES)?);
        Ok(self)
    }

    pub fn libraries(&self) -> Option<&str> {
        self.libraries.as_deref()
    }

    pub fn set_libraries(&mut self, libraries: &str) -> ExtensionResult<&mut Self> {
        self.libraries = Some(self.checked_name(libraries, LIBRARIES)?);
        Ok(self)
    }

    pub fn resources(&self) -> Option<&str> {
        self.resources.as_deref()
    }

    pub fn set_resources(&mut self, resources: &str) -> ExtensionResult<&mut Self> {
        self.resources = Some(self.checked_name(resources, RESOURCES)?);
        Ok(self)
    }

    pub fn has_models(&self) -> bool {
        self.models.is_some()
    }

    /// Absolute path of the models folder.
    ///
    /// # Errors
    /// [`ExtensionError::FolderNotSpecified`] when no models folder is declared,
    /// [`ExtensionError::RelativeFolderWithoutRoot`] when it cannot be resolved.
    pub fn models_folder(&self) -> ExtensionResult<PathBuf> {
        self.resolve_declared(self.models.as_deref(), MODELS)
    }

    pub fn modules_folder(&self) -> ExtensionResult<PathBuf> {
        self.resolve_declared(self.modules.as_deref(), MODULES)
    }

    pub fn libraries_folder(&self) -> ExtensionResult<PathBuf> {
        self.resolve_declared(self.libraries.as_deref(), LIBRARIES)
    }

    pub fn resources_folder(&self) -> ExtensionResult<PathBuf> {
        self.resolve_declared(self.resources.as_deref(), RESOURCES)
    }

    /// Like [`models_folder`](Self::models_folder), but `Ok(None)` when the
    /// folder is not declared.
    pub fn models_folder_if_declared(&self) -> ExtensionResult<Option<PathBuf>> {
        self.models.as_deref().map(|f| self.resolve(f)).transpose()
    }

    pub fn modules_folder_if_declared(&self) -> ExtensionResult<Option<PathBuf>> {
        self.modules.as_deref().map(|f| self.resolve(f)).transpose()
    }

    pub fn libraries_folder_if_declared(&self) -> ExtensionResult<Option<PathBuf>> {
        self.libraries.as_deref().map(|f| self.resolve(f)).transpose()
    }

    pub fn resources_folder_if_declared(&self) -> ExtensionResult<Option<PathBuf>> {
        self.resources.as_deref().map(|f| self.resolve(f)).transpose()
    }

    /// Resolves `folder` against the root. Absolute paths are returned as is.
    pub fn resolve(&self, folder: &str) -> ExtensionResult<PathBuf> {
        let path = Path::new(folder);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        match &self.root {
            Some(root) => Ok(root.join(path)),
            None => Err(ExtensionError::RelativeFolderWithoutRoot {
                folder: folder.to_string(),
            }),
        }
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn set_immutable(&mut self) {
        self.immutable = true;
    }

    /// Serializes the declared names only; the root is never written.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut result = Map::new();
        let declared = [
            (MODELS, &self.models),
            (MODULES, &self.modules),
            (LIBRARIES, &self.libraries),
            (RESOURCES, &self.resources),
        ];
        for (key, value) in declared {
            if let Some(value) = value {
                result.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        result
    }

    fn resolve_declared(&self, folder: Option<&str>, kind: &'static str) -> ExtensionResult<PathBuf> {
        let folder = folder.ok_or(ExtensionError::FolderNotSpecified(kind))?;
        self.resolve(folder)
    }

    fn checked_name(&self, name: &str, field: &'static str) -> ExtensionResult<String> {
        self.check_mutable()?;
        if name.is_empty() {
            return Err(ExtensionError::EmptyField(field));
        }
        Ok(name.to_string())
    }

    fn check_mutable(&self) -> ExtensionResult<()> {
        if self.immutable {
            Err(ExtensionError::ImmutableState("The platform folders"))
        } else {
            Ok(())
        }
    }
}

/// `root` made absolute against the current directory; an empty path
/// (the parent of a bare file name) stands for the current directory.
fn absolute_root(root: PathBuf) -> PathBuf {
    let root = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root
    };
    std::path::absolute(&root).unwrap_or(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let mut folders = Folders::with_root("/opt/ext");
        folders.set_models("models").unwrap();
        folders.set_libraries("/usr/lib/chain").unwrap();

        assert_eq!(folders.models_folder().unwrap(), PathBuf::from("/opt/ext/models"));
        assert_eq!(
            folders.libraries_folder().unwrap(),
            PathBuf::from("/usr/lib/chain")
        );
    }

    #[test]
    fn test_relative_folder_without_root_fails() {
        let mut folders = Folders::new();
        folders.set_models("models").unwrap();

        let error = folders.models_folder().unwrap_err();
        assert!(matches!(error, ExtensionError::RelativeFolderWithoutRoot { ref folder } if folder == "models"));
        assert!(error.to_string().contains("You must use absolute paths"));
    }

    #[test]
    fn test_undeclared_folder() {
        let folders = Folders::with_root("/opt/ext");
        let error = folders.resources_folder().unwrap_err();
        assert_eq!(error.to_string(), "Folder \"resources\" is not specified in this platform");
        assert_eq!(folders.resources_folder_if_declared().unwrap(), None);
    }

    #[test]
    fn test_immutable_folders_reject_changes() {
        let mut folders = Folders::with_root("/opt/ext");
        folders.set_immutable();

        assert!(matches!(
            folders.set_models("models"),
            Err(ExtensionError::ImmutableState("The platform folders"))
        ));
        assert!(folders.set_root(None).is_err());
        assert_eq!(folders.models(), None);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut folders = Folders::new();
        assert!(matches!(
            folders.set_modules(""),
            Err(ExtensionError::EmptyField("modules"))
        ));

        let object = json!({"models": ""});
        let object = object.as_object().unwrap();
        assert!(Folders::parse(object, None).is_err());
    }

    #[test]
    fn test_root_is_absolute() {
        struct TestCase {
            name: &'static str,
            root: PathBuf,
        }

        let test_cases = vec![
            TestCase {
                name: "relative root",
                root: PathBuf::from("extensions/python"),
            },
            TestCase {
                name: "parent of a bare file name",
                root: PathBuf::new(),
            },
            TestCase {
                name: "absolute root",
                root: PathBuf::from("/opt/ext"),
            },
        ];

        let cwd = std::env::current_dir().unwrap();
        for tc in test_cases {
            let expected = if tc.root.as_os_str().is_empty() {
                cwd.clone()
            } else {
                cwd.join(&tc.root)
            };

            let mut folders = Folders::with_root(tc.root.clone());
            folders.set_models("models").unwrap();
            assert!(folders.root().unwrap().is_absolute(), "case: {}", tc.name);
            assert_eq!(folders.models_folder().unwrap(), expected.join("models"), "case: {}", tc.name);

            let mut folders = Folders::rooted(Some(tc.root.clone()));
            folders.set_root(Some(tc.root.clone())).unwrap();
            assert_eq!(folders.root(), Some(expected.as_path()), "case: {}", tc.name);

            let object = json!({"models": "m"});
            let folders = Folders::parse(object.as_object().unwrap(), Some(tc.root)).unwrap();
            assert_eq!(folders.models_folder().unwrap(), expected.join("m"), "case: {}", tc.name);
        }
    }

    #[test]
    fn test_to_json_writes_declared_names_only() {
        let object = json!({"models": "m", "resources": "r"});
        let folders =
            Folders::parse(object.as_object().unwrap(), Some(PathBuf::from("/root"))).unwrap();

        assert_eq!(Value::Object(folders.to_json()), json!({"models": "m", "resources": "r"}));
    }
}
