//! Resource modules: named bundles of scripts and stylesheets with context-dependent variants.

mod definition;

use std::collections::BTreeMap;
use std::sync::Mutex;

pub use definition::{
  ModuleDefinition, ModuleFiles, PathItemConfig, PathListConfig, StringListConfig, VariantConfig,
};

use crate::config::{ModuleRegistry, ServerPaths};
use crate::error::Result;
use crate::services::ModuleServices;

/// A configured module answering content and freshness queries for request contexts.
///
/// Configuration is fixed at construction. The only mutable state is the freshness cache, which
/// grows by one entry per distinct context fingerprint and is never evicted.
#[derive(Debug)]
pub struct ResourceModule {
  pub(crate) name: String,
  pub(crate) files: ModuleFiles,
  pub(crate) dependencies: Vec<String>,
  pub(crate) messages: Vec<String>,
  pub(crate) group: Option<String>,
  pub(crate) paths: ServerPaths,
  pub(crate) services: ModuleServices,
  pub(crate) modified_times: Mutex<BTreeMap<String, u64>>,
}

impl ResourceModule {
  /// Build a module from its definition, prefixing every path with `base_path`.
  ///
  /// A `basePath` set in the definition itself takes precedence over `base_path`.
  pub fn new(
    name: impl Into<String>,
    definition: &ModuleDefinition,
    base_path: &str,
    paths: ServerPaths,
    services: ModuleServices,
  ) -> Self {
    let base_path = definition.base_path.as_deref().unwrap_or(base_path);
    Self {
      name: name.into(),
      files: definition.resolve_files(base_path),
      dependencies: definition.dependency_names(),
      messages: definition.message_keys(),
      group: definition.group.clone(),
      paths,
      services,
      modified_times: Mutex::new(BTreeMap::new()),
    }
  }

  /// Build the named module from a registry, sharing the registry's server paths.
  pub fn from_registry(
    registry: &ModuleRegistry,
    name: &str,
    services: ModuleServices,
  ) -> Result<Self> {
    let definition = registry.module(name)?;
    Ok(Self::new(name, definition, "", registry.paths.clone(), services))
  }

  /// Module name, used as the dependency record key.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Resolved path lists.
  pub fn files(&self) -> &ModuleFiles {
    &self.files
  }

  /// Message keys the module needs.
  pub fn get_messages(&self) -> &[String] {
    &self.messages
  }

  /// Delivery group, if configured.
  pub fn get_group(&self) -> Option<&str> {
    self.group.as_deref()
  }

  /// Names of the modules this module depends on.
  pub fn get_dependencies(&self) -> &[String] {
    &self.dependencies
  }

  /// Files recorded as style dependencies for `skin`; empty when nothing has been recorded.
  pub fn get_file_dependencies(&self, skin: &str) -> Result<Vec<String>> {
    Ok(
      self
        .services
        .dependencies
        .get(&self.name, skin)?
        .unwrap_or_default(),
    )
  }
}

#[cfg(test)]
pub(crate) mod test_support {
  use std::collections::BTreeMap;
  use std::path::{Path, PathBuf};
  use std::sync::{Arc, Mutex};

  use crate::config::ServerPaths;
  use crate::css::{CssReferenceExtractor, CssUrlRemapper};
  use crate::dependencies::MemoryDependencyStore;
  use crate::error::{BundleError, Result};
  use crate::services::{FileSystem, ModuleServices, StaticTranslations};

  pub const INSTALL_ROOT: &str = "/srv/wiki";

  /// In-memory file tree counting every stat probe.
  #[derive(Debug, Default)]
  pub struct FakeFiles {
    files: Mutex<BTreeMap<PathBuf, (String, u64)>>,
    stats: Mutex<Vec<PathBuf>>,
  }

  impl FakeFiles {
    pub fn add(&self, path: &str, content: &str, modified: u64) {
      self
        .files
        .lock()
        .unwrap()
        .insert(Path::new(INSTALL_ROOT).join(path), (content.to_string(), modified));
    }

    pub fn stat_count(&self) -> usize {
      self.stats.lock().unwrap().len()
    }
  }

  impl FileSystem for FakeFiles {
    fn read_to_string(&self, path: &Path) -> Result<String> {
      self
        .files
        .lock()
        .unwrap()
        .get(path)
        .map(|(content, _)| content.clone())
        .ok_or_else(|| {
          BundleError::io(path, std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        })
    }

    fn modified(&self, path: &Path) -> Result<u64> {
      self.stats.lock().unwrap().push(path.to_path_buf());
      self
        .files
        .lock()
        .unwrap()
        .get(path)
        .map(|(_, modified)| *modified)
        .ok_or_else(|| {
          BundleError::io(path, std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        })
    }
  }

  pub struct Harness {
    pub files: Arc<FakeFiles>,
    pub store: Arc<MemoryDependencyStore>,
    pub paths: ServerPaths,
    pub services: ModuleServices,
  }

  pub fn harness(translations: StaticTranslations) -> Harness {
    let files = Arc::new(FakeFiles::default());
    let store = Arc::new(MemoryDependencyStore::default());
    let paths = ServerPaths::new(INSTALL_ROOT, "/w");
    let services = ModuleServices {
      files: files.clone(),
      remapper: Arc::new(CssUrlRemapper),
      extractor: Arc::new(CssReferenceExtractor::new(&paths.public_base_path)),
      translations: Arc::new(translations),
      dependencies: store.clone(),
    };
    Harness {
      files,
      store,
      paths,
      services,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::test_support::harness;
  use super::*;
  use crate::dependencies::DependencyStore;
  use crate::services::StaticTranslations;

  fn definition(json: &str) -> ModuleDefinition {
    serde_json::from_str(json).unwrap()
  }

  #[test]
  fn exposes_metadata_accessors() {
    let h = harness(StaticTranslations::default());
    let module = ResourceModule::new(
      "site",
      &definition(r#"{"dependencies": ["jquery", "util"], "messages": "hello", "group": "user"}"#),
      "",
      h.paths.clone(),
      h.services.clone(),
    );

    assert_eq!(module.name(), "site");
    assert_eq!(module.get_dependencies(), ["jquery".to_string(), "util".to_string()]);
    assert_eq!(module.get_messages(), ["hello".to_string()]);
    assert_eq!(module.get_group(), Some("user"));
  }

  #[test]
  fn missing_group_is_absent() {
    let h = harness(StaticTranslations::default());
    let module = ResourceModule::new("site", &definition("{}"), "", h.paths, h.services);
    assert_eq!(module.get_group(), None);
    assert!(module.get_dependencies().is_empty());
  }

  #[test]
  fn definition_base_path_overrides_argument() {
    let h = harness(StaticTranslations::default());
    let module = ResourceModule::new(
      "site",
      &definition(r#"{"basePath": "skins/vector", "scripts": "a.js"}"#),
      "ignored",
      h.paths,
      h.services,
    );
    assert_eq!(module.files().scripts[0].path(), "skins/vector/a.js");
  }

  #[test]
  fn file_dependencies_read_from_store() {
    let h = harness(StaticTranslations::default());
    h.store.put("site", "vector", &["img/a.png".to_string()]).unwrap();
    let module = ResourceModule::new("site", &definition("{}"), "", h.paths, h.services);

    assert_eq!(module.get_file_dependencies("vector").unwrap(), vec!["img/a.png"]);
    assert!(module.get_file_dependencies("monobook").unwrap().is_empty());
  }

  #[test]
  fn builds_from_registry() {
    let h = harness(StaticTranslations::default());
    let registry: ModuleRegistry = serde_json::from_str(
      r#"{"modules": {"site": {"basePath": "modules/site", "scripts": "site.js"}}}"#,
    )
    .unwrap();

    let module = ResourceModule::from_registry(&registry, "site", h.services.clone()).unwrap();
    assert_eq!(module.files().scripts[0].path(), "modules/site/site.js");
    assert!(ResourceModule::from_registry(&registry, "other", h.services).is_err());
  }
}
