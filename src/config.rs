//! Registry configuration loader describing server layout and module definitions.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{BundleError, Result};
use crate::module::ModuleDefinition;

/// Registry file name looked up by [`ModuleRegistry::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "resources.json";

/// Where module files live on disk and where they are served from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerPaths {
  /// Directory that configured module paths are relative to.
  pub install_root: PathBuf,
  /// URL path under which the install root is publicly served.
  pub public_base_path: String,
}

impl Default for ServerPaths {
  fn default() -> Self {
    Self {
      install_root: PathBuf::from("."),
      public_base_path: String::new(),
    }
  }
}

impl ServerPaths {
  /// Layout rooted at `install_root` and served from `public_base_path`.
  pub fn new(install_root: impl Into<PathBuf>, public_base_path: impl Into<String>) -> Self {
    Self {
      install_root: install_root.into(),
      public_base_path: public_base_path.into(),
    }
  }

  /// Absolute location of an install-relative path.
  pub fn resolve(&self, path: &str) -> PathBuf {
    self.install_root.join(path.trim_start_matches('/'))
  }

  /// Public URL directory for an install-relative directory.
  pub fn public_dir(&self, dir: &str) -> String {
    let base = self.public_base_path.trim_end_matches('/');
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
      format!("{base}/")
    } else {
      format!("{base}/{dir}")
    }
  }
}

/// Registry file layout: server paths plus named module definitions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModuleRegistry {
  /// Server layout shared by every module.
  pub paths: ServerPaths,
  /// Module definitions keyed by module name, in authored order.
  pub modules: IndexMap<String, ModuleDefinition>,
}

impl ModuleRegistry {
  /// Load the default registry file from `dir`, falling back to an empty registry when absent.
  pub fn discover(dir: &Path) -> Result<Self> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      return Ok(Self::default());
    }
    Self::load_from_path(&candidate)
  }

  /// Read a registry from a JSON or YAML file, chosen by extension.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| BundleError::io(path, err))?;
    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
      serde_yaml::from_str(&content).map_err(|err| err.to_string())
    } else {
      serde_json::from_str(&content).map_err(|err| err.to_string())
    };

    parsed.map_err(|message| BundleError::Config {
      path: path.to_path_buf(),
      message,
    })
  }

  /// Definition of the named module.
  pub fn module(&self, name: &str) -> Result<&ModuleDefinition> {
    self
      .modules
      .get(name)
      .ok_or_else(|| BundleError::UnknownModule(name.to_string()))
  }

  /// Module names in authored order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.modules.keys().map(String::as_str)
  }
}
