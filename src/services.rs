//! Collaborator interfaces consumed by modules, with their local default implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use crate::config::ServerPaths;
use crate::css::{CssReferenceExtractor, CssUrlRemapper, StyleReferenceExtractor, StyleRemapper};
use crate::dependencies::DependencyStore;
use crate::error::{BundleError, Result};

/// Raw file access used for content generation and freshness checks.
pub trait FileSystem: Send + Sync {
  /// Read a file as text.
  fn read_to_string(&self, path: &Path) -> Result<String>;

  /// Last-modified time of a file in whole seconds since the Unix epoch.
  fn modified(&self, path: &Path) -> Result<u64>;
}

/// Freshness of the translated messages for a language.
pub trait TranslationFreshness: Send + Sync {
  /// Timestamp (seconds) at which messages for `language` last changed.
  fn modified_time(&self, language: &str) -> u64;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
  fn read_to_string(&self, path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| BundleError::io(path, err))
  }

  fn modified(&self, path: &Path) -> Result<u64> {
    let modified = fs::metadata(path)
      .and_then(|metadata| metadata.modified())
      .map_err(|err| BundleError::io(path, err))?;
    Ok(
      modified
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0),
    )
  }
}

/// Fixed language → timestamp table; unknown languages report `0`.
#[derive(Debug, Clone, Default)]
pub struct StaticTranslations {
  timestamps: BTreeMap<String, u64>,
}

impl StaticTranslations {
  /// Record the freshness of one language.
  pub fn with_language(mut self, language: impl Into<String>, timestamp: u64) -> Self {
    self.timestamps.insert(language.into(), timestamp);
    self
  }
}

impl TranslationFreshness for StaticTranslations {
  fn modified_time(&self, language: &str) -> u64 {
    self.timestamps.get(language).copied().unwrap_or(0)
  }
}

/// Collaborators injected into every [`crate::ResourceModule`].
#[derive(Clone)]
pub struct ModuleServices {
  /// File read and stat access.
  pub files: Arc<dyn FileSystem>,
  /// Stylesheet `url()` rewriting.
  pub remapper: Arc<dyn StyleRemapper>,
  /// Local file reference discovery in generated styles.
  pub extractor: Arc<dyn StyleReferenceExtractor>,
  /// Message freshness per language.
  pub translations: Arc<dyn TranslationFreshness>,
  /// Persisted style dependency records.
  pub dependencies: Arc<dyn DependencyStore>,
}

impl ModuleServices {
  /// Local-disk collaborators for the given server layout and dependency store.
  pub fn local(paths: &ServerPaths, dependencies: Arc<dyn DependencyStore>) -> Self {
    Self {
      files: Arc::new(LocalFileSystem),
      remapper: Arc::new(CssUrlRemapper),
      extractor: Arc::new(CssReferenceExtractor::new(&paths.public_base_path)),
      translations: Arc::new(StaticTranslations::default()),
      dependencies,
    }
  }

  /// Replace the translation freshness source.
  pub fn with_translations(mut self, translations: Arc<dyn TranslationFreshness>) -> Self {
    self.translations = translations;
    self
  }
}

impl std::fmt::Debug for ModuleServices {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ModuleServices").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn local_file_system_reads_and_stats() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("core.js");
    fs::write(&path, "var core;").unwrap();

    let files = LocalFileSystem;
    assert_eq!(files.read_to_string(&path).unwrap(), "var core;");
    assert!(files.modified(&path).unwrap() > 0);
  }

  #[test]
  fn local_file_system_reports_missing_paths() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.css");

    let err = LocalFileSystem.modified(&missing).unwrap_err();
    assert!(matches!(err, BundleError::Io { ref path, .. } if path == &missing));
    assert!(LocalFileSystem.read_to_string(&missing).is_err());
  }

  #[test]
  fn static_translations_default_to_zero() {
    let translations = StaticTranslations::default().with_language("de", 1_700_000_000);
    assert_eq!(translations.modified_time("de"), 1_700_000_000);
    assert_eq!(translations.modified_time("fr"), 0);
  }
}
