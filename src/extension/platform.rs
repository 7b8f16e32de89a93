// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::consts::{DEFAULT_NAME, DYNAMIC_ID_PREFIX, DYNAMIC_ID_SUFFIX, JVM_TECHNOLOGY};
use super::{Configuration, Dependency, Folders};
use crate::errors::{ExtensionError, ExtensionResult};
use crate::utils::json::{self, opt_array, opt_object, opt_str, req_str, FieldError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static DYNAMIC_ID_INDEX: AtomicU64 = AtomicU64::new(0);

/// Generates a platform id for manifests that do not declare one.
///
/// Ids are unique within the process for any number of concurrent callers.
pub fn make_unique_id() -> String {
    let index = DYNAMIC_ID_INDEX.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}{}{}", DYNAMIC_ID_PREFIX, index, DYNAMIC_ID_SUFFIX)
}

/// One execution technology contributed by an extension.
///
/// # Immutability
///
/// [`set_immutable`](Self::set_immutable) seals the platform together with its
/// [`Folders`] and every [`Dependency`]; afterwards all their mutators return
/// [`ExtensionError::ImmutableState`]. The flag is cooperative: it protects
/// against later changes, not against a writer racing with the sealing call.
/// [`PlatformRegistry`](super::PlatformRegistry) only shares a platform after
/// sealing it, and mutators require `&mut self`, so a shared platform cannot be
/// changed at all.
#[derive(Debug, Clone)]
pub struct Platform {
    file: Option<PathBuf>,
    id: String,
    category: Option<String>,
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    technology: String,
    jvm_technology: bool,
    language: Option<String>,
    folders: Folders,
    configuration: Configuration,
    dependencies: Vec<Dependency>,
    immutable: bool,
}

impl Platform {
    pub fn new(technology: &str) -> ExtensionResult<Self> {
        let mut platform = Self {
            file: None,
            id: make_unique_id(),
            category: None,
            name: DEFAULT_NAME.to_string(),
            description: None,
            tags: Vec::new(),
            technology: String::new(),
            jvm_technology: false,
            language: None,
            folders: Folders::new(),
            configuration: Configuration::new(),
            dependencies: Vec::new(),
            immutable: false,
        };
        platform.set_technology(technology)?;
        Ok(platform)
    }

    /// Reads one element of the manifest `"platforms"` array.
    ///
    /// The folders root is the parent directory of `file`, whether or not a
    /// `"folders"` object is present. A non-string tag or a non-object
    /// dependency fails the whole platform.
    pub fn parse(object: &Map<String, Value>, file: Option<&Path>) -> ExtensionResult<Self> {
        let owned_file = file.map(Path::to_path_buf);
        let format = |e: FieldError| ExtensionError::format(owned_file.clone(), e.0);

        let technology = req_str(object, "technology").map_err(format)?;
        if technology.is_empty() {
            return Err(ExtensionError::format(
                owned_file.clone(),
                "\"technology\" must not be empty",
            ));
        }
        let mut platform = Self::new(technology)?;
        platform.file = owned_file.clone();

        if let Some(id) = opt_str(object, "id").map_err(format)? {
            platform.id = id.to_string();
        }
        platform.category = opt_str(object, "category").map_err(format)?.map(str::to_string);
        if let Some(name) = opt_str(object, "name").map_err(format)? {
            platform.name = name.to_string();
        }
        platform.description = opt_str(object, "description")
            .map_err(format)?
            .map(str::to_string);
        if let Some(tags) = opt_array(object, "tags").map_err(format)? {
            for tag in json::string_array(tags, "tags").map_err(format)? {
                platform.push_tag(tag);
            }
        }
        platform.language = opt_str(object, "language").map_err(format)?.map(str::to_string);

        let root = file.and_then(Path::parent).map(Path::to_path_buf);
        platform.folders = match opt_object(object, "folders").map_err(format)? {
            Some(folders) => Folders::parse(folders, root).map_err(format)?,
            None => Folders::rooted(root),
        };
        if let Some(configuration) = opt_object(object, "configuration").map_err(format)? {
            platform.configuration = Configuration::parse(configuration).map_err(format)?;
        }
        if let Some(dependencies) = opt_array(object, "dependencies").map_err(format)? {
            for dependency in json::objects(dependencies, "dependencies").map_err(format)? {
                platform
                    .dependencies
                    .push(Dependency::parse(dependency).map_err(format)?);
            }
        }
        Ok(platform)
    }

    /// Manifest file this platform was read from.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.id = id.into();
        Ok(self)
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_category(&mut self, category: Option<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.category = category;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.name = name.into();
        Ok(self)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.description = description;
        Ok(self)
    }

    /// Tags in first-seen order, without duplicates.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_tags<I, S>(&mut self, tags: I) -> ExtensionResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_mutable()?;
        self.tags.clear();
        for tag in tags {
            self.push_tag(tag.into());
        }
        Ok(self)
    }

    pub fn technology(&self) -> &str {
        &self.technology
    }

    pub fn set_technology(&mut self, technology: &str) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        if technology.is_empty() {
            return Err(ExtensionError::EmptyField("technology"));
        }
        self.technology = technology.to_string();
        self.jvm_technology = technology.eq_ignore_ascii_case(JVM_TECHNOLOGY);
        Ok(self)
    }

    pub fn is_jvm_technology(&self) -> bool {
        self.jvm_technology
    }

    /// Whether executors of this platform run in-process, without an external interpreter.
    pub fn is_built_in(&self) -> bool {
        self.is_jvm_technology()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: Option<String>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.language = language;
        Ok(self)
    }

    pub fn folders(&self) -> &Folders {
        &self.folders
    }

    /// Mutable access to the folders; their own mutators fail once sealed.
    pub fn folders_mut(&mut self) -> &mut Folders {
        &mut self.folders
    }

    pub fn set_folders(&mut self, folders: Folders) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.folders = folders;
        Ok(self)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn set_configuration(&mut self, configuration: Configuration) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.configuration = configuration;
        Ok(self)
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn dependency_mut(&mut self, index: usize) -> Option<&mut Dependency> {
        self.dependencies.get_mut(index)
    }

    pub fn set_dependencies(&mut self, dependencies: Vec<Dependency>) -> ExtensionResult<&mut Self> {
        self.check_mutable()?;
        self.dependencies = dependencies;
        Ok(self)
    }

    pub fn has_models(&self) -> bool {
        self.folders.has_models()
    }

    pub fn models_folder(&self) -> ExtensionResult<PathBuf> {
        self.folders.models_folder()
    }

    pub fn models_folder_if_declared(&self) -> ExtensionResult<Option<PathBuf>> {
        self.folders.models_folder_if_declared()
    }

    /// Classpath entries resolved against the platform root.
    ///
    /// Wildcard entries such as `lib/*` are not file paths and are skipped.
    pub fn valid_resource_paths(&self) -> ExtensionResult<Vec<PathBuf>> {
        self.configuration
            .classpath()
            .iter()
            .filter(|entry| !entry.contains('*'))
            .map(|entry| self.folders.resolve(entry))
            .collect()
    }

    /// Fails on the first resource path that does not exist, but only when the
    /// configuration sets `require_existing_paths`.
    pub fn check_resource_paths_if_required(&self) -> ExtensionResult<()> {
        if !self.configuration.require_existing_paths() {
            return Ok(());
        }
        for path in self.valid_resource_paths()? {
            if !path.exists() {
                return Err(ExtensionError::MissingResourcePath {
                    file: self.file.clone(),
                    path: std::path::absolute(&path).unwrap_or(path),
                    classpath: self.configuration.classpath().to_vec(),
                });
            }
        }
        Ok(())
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn set_immutable(&mut self) {
        self.immutable = true;
        self.folders.set_immutable();
        self.dependencies.iter_mut().for_each(Dependency::set_immutable);
    }

    pub fn to_json(&self) -> Map<String, Value> {
        let mut result = Map::new();
        result.insert("id".to_string(), Value::String(self.id.clone()));
        if let Some(category) = &self.category {
            result.insert("category".to_string(), Value::String(category.clone()));
        }
        result.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(description) = &self.description {
            result.insert("description".to_string(), Value::String(description.clone()));
        }
        if !self.tags.is_empty() {
            let tags = self.tags.iter().cloned().map(Value::String).collect();
            result.insert("tags".to_string(), Value::Array(tags));
        }
        result.insert("technology".to_string(), Value::String(self.technology.clone()));
        if let Some(language) = &self.language {
            result.insert("language".to_string(), Value::String(language.clone()));
        }
        result.insert("folders".to_string(), Value::Object(self.folders.to_json()));
        result.insert(
            "configuration".to_string(),
            Value::Object(self.configuration.to_json()),
        );
        if !self.dependencies.is_empty() {
            let dependencies = self
                .dependencies
                .iter()
                .map(|d| Value::Object(d.to_json()))
                .collect();
            result.insert("dependencies".to_string(), Value::Array(dependencies));
        }
        result
    }

    fn push_tag(&mut self, tag: String) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    fn check_mutable(&self) -> ExtensionResult<()> {
        if self.immutable {
            Err(ExtensionError::ImmutableState("This platform"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn parse(value: Value, file: Option<&Path>) -> ExtensionResult<Platform> {
        Platform::parse(value.as_object().unwrap(), file)
    }

    #[test]
    fn test_jvm_technology_in_any_case_is_built_in() {
        struct TestCase {
            technology: &'static str,
            built_in: bool,
        }

        let test_cases = vec![
            TestCase { technology: "jvm", built_in: true },
            TestCase { technology: "JVM", built_in: true },
            TestCase { technology: "Jvm", built_in: true },
            TestCase { technology: "python", built_in: false },
            TestCase { technology: "jvm2", built_in: false },
        ];

        for tc in test_cases {
            let platform = parse(json!({"technology": tc.technology}), None).unwrap();
            assert_eq!(platform.is_built_in(), tc.built_in, "technology: {}", tc.technology);
            assert_eq!(platform.is_jvm_technology(), tc.built_in);
        }
    }

    #[test]
    fn test_defaults() {
        let platform = parse(json!({"technology": "python"}), None).unwrap();
        assert_eq!(platform.name(), "Unnamed");
        assert!(platform.id().starts_with("_dynamic_id_"));
        assert!(platform.tags().is_empty());
        assert!(platform.configuration().classpath().is_empty());
        assert!(platform.dependencies().is_empty());
        assert_eq!(platform.folders().root(), None);
    }

    #[test]
    fn test_default_ids_are_distinct() {
        let ids: HashSet<String> = (0..100)
            .map(|_| parse(json!({"technology": "jvm"}), None).unwrap().id().to_string())
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_default_ids_are_distinct_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..50).map(|_| make_unique_id()).collect::<Vec<_>>()))
            .collect();
        let ids: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_tags_are_deduplicated_in_order() {
        let platform =
            parse(json!({"technology": "jvm", "tags": ["b", "a", "b", "c", "a"]}), None).unwrap();
        assert_eq!(platform.tags(), &["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_elements_abort_parse() {
        let file = PathBuf::from("/ext/extension.json");
        let error = parse(json!({"technology": "jvm", "tags": ["a", 1]}), Some(&file)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid JSON /ext/extension.json: \"tags\" array contains non-string element 1"
        );

        let error = parse(json!({"technology": "jvm", "dependencies": ["core"]}), None).unwrap_err();
        assert!(matches!(error, ExtensionError::Format { .. }));

        let error = parse(json!({"name": "No technology"}), None).unwrap_err();
        assert!(matches!(error, ExtensionError::Format { .. }));

        let error = parse(json!({"technology": ""}), None).unwrap_err();
        assert!(matches!(error, ExtensionError::Format { .. }));
    }

    #[test]
    fn test_folders_root_is_manifest_parent() {
        let file = PathBuf::from("/ext/python/extension.json");

        let platform = parse(json!({"technology": "python"}), Some(&file)).unwrap();
        assert_eq!(platform.folders().root(), Some(Path::new("/ext/python")));

        let platform = parse(
            json!({"technology": "python", "folders": {"models": "models"}}),
            Some(&file),
        )
        .unwrap();
        assert_eq!(
            platform.models_folder().unwrap(),
            PathBuf::from("/ext/python/models")
        );
    }

    #[test]
    fn test_bare_manifest_file_name_roots_at_current_dir() {
        let file = PathBuf::from("extension.json");
        let platform = parse(
            json!({"technology": "python", "folders": {"models": "models"}}),
            Some(&file),
        )
        .unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(platform.folders().root(), Some(cwd.as_path()));
        assert_eq!(platform.models_folder().unwrap(), cwd.join("models"));
    }

    #[test]
    fn test_sealed_platform_rejects_every_mutator() {
        let mut platform = parse(
            json!({
                "technology": "jvm",
                "folders": {"models": "m"},
                "dependencies": [{"id": "core"}]
            }),
            None,
        )
        .unwrap();
        platform.set_immutable();

        assert!(platform.set_name("other").is_err());
        assert!(platform.set_id("other").is_err());
        assert!(platform.set_category(None).is_err());
        assert!(platform.set_tags(["x"]).is_err());
        assert!(platform.set_technology("python").is_err());
        assert!(platform.set_language(None).is_err());
        assert!(platform.set_folders(Folders::new()).is_err());
        assert!(platform.set_configuration(Configuration::new()).is_err());
        assert!(platform.set_dependencies(Vec::new()).is_err());
        assert!(platform.folders_mut().set_models("other").is_err());
        assert!(platform
            .dependency_mut(0)
            .unwrap()
            .set_name(Some("Core".to_string()))
            .is_err());

        assert_eq!(platform.technology(), "jvm");
        assert_eq!(platform.folders().models(), Some("m"));
        let error = platform.set_name("x").unwrap_err();
        assert_eq!(error.to_string(), "This platform is immutable and cannot be changed");
    }

    #[test]
    fn test_check_resource_paths_only_when_required() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/a.jar"), b"").unwrap();
        let file = dir.path().join("extension.json");

        let platform = parse(
            json!({
                "technology": "jvm",
                "configuration": {"classpath": ["lib/a.jar", "lib/*", "lib/missing.jar"]}
            }),
            Some(&file),
        )
        .unwrap();
        assert!(platform.check_resource_paths_if_required().is_ok());
        assert_eq!(platform.valid_resource_paths().unwrap().len(), 2);

        let platform = parse(
            json!({
                "technology": "jvm",
                "configuration": {
                    "classpath": ["lib/a.jar", "lib/*", "lib/missing.jar"],
                    "require_existing_paths": true
                }
            }),
            Some(&file),
        )
        .unwrap();
        let error = platform.check_resource_paths_if_required().unwrap_err();
        match error {
            ExtensionError::MissingResourcePath { path, classpath, .. } => {
                assert!(path.ends_with("lib/missing.jar"));
                assert_eq!(classpath.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_to_json_emits_optional_fields_only_when_present() {
        let source = json!({
            "id": "p1",
            "name": "Python",
            "technology": "python",
            "folders": {},
            "configuration": {}
        });
        let platform = parse(source.clone(), None).unwrap();
        assert_eq!(Value::Object(platform.to_json()), source);
    }
}
