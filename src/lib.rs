#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bundle;
pub mod config;
pub mod css;
pub mod dependencies;
pub mod error;
mod freshness;
pub mod logging;
pub mod models;
pub mod module;
pub mod selection;
pub mod services;

pub use config::{ModuleRegistry, ServerPaths};
pub use dependencies::{DependencyStore, JsonDependencyStore, MemoryDependencyStore};
pub use error::{BundleError, Result};
pub use models::{Context, PathEntry, StyleMap};
pub use module::{ModuleDefinition, ResourceModule};
pub use selection::DEFAULT_VARIANT;
pub use services::{FileSystem, LocalFileSystem, ModuleServices, TranslationFreshness};
