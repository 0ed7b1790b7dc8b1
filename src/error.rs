//! Error types shared by the module resolution and freshness engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Failures surfaced by module operations.
#[derive(Debug, Error)]
pub enum BundleError {
  /// A file could not be read or stat'ed.
  #[error("failed to access {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The dependency record store rejected a read or write.
  #[error("dependency store error for {module}/{skin}: {message}")]
  Store {
    /// Module the record belongs to.
    module: String,
    /// Skin the record belongs to.
    skin: String,
    /// Description of the failure.
    message: String,
  },
  /// A registry or module configuration file could not be parsed.
  #[error("invalid configuration in {}: {message}", path.display())]
  Config {
    /// Path of the configuration file.
    path: PathBuf,
    /// Parser error message.
    message: String,
  },
  /// A module name was requested that the registry does not define.
  #[error("unknown module `{0}`")]
  UnknownModule(String),
}

impl BundleError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn store(module: &str, skin: &str, message: impl std::fmt::Display) -> Self {
    Self::Store {
      module: module.to_string(),
      skin: skin.to_string(),
      message: message.to_string(),
    }
  }
}
