//! Declarative module configuration and its resolution into prefixed path lists.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::models::{PathAttributes, PathEntry, PathList, VariantMap};

/// Module configuration as authored in a registry file.
///
/// Every option is optional and unknown keys are ignored. Path options accept a single path, a
/// list of paths, a `{path: {attribute: value}}` object, or a list mixing both forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleDefinition {
  /// Prefix applied to every configured path.
  pub base_path: Option<String>,
  /// Scripts served in every context.
  pub scripts: Option<PathListConfig>,
  /// Scripts selected by language code.
  pub language_scripts: Option<VariantConfig>,
  /// Scripts selected by skin, falling back to `default`.
  pub skin_scripts: Option<VariantConfig>,
  /// Scripts appended only in debug contexts.
  pub debug_scripts: Option<PathListConfig>,
  /// Scripts that make up the module's loader stub.
  pub loader_scripts: Option<PathListConfig>,
  /// Stylesheets served in every context.
  pub styles: Option<PathListConfig>,
  /// Stylesheets selected by skin, falling back to `default`.
  pub skin_styles: Option<VariantConfig>,
  /// Names of modules this module depends on.
  pub dependencies: Option<StringListConfig>,
  /// Message keys the module needs at runtime.
  pub messages: Option<StringListConfig>,
  /// Optional delivery group.
  pub group: Option<String>,
}

/// Accepted shapes for a path list option.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathListConfig {
  /// A single bare path.
  Single(String),
  /// A list of bare or attributed paths.
  List(Vec<PathItemConfig>),
  /// One or more paths keyed to their attribute maps.
  Attributed(IndexMap<String, PathAttributes>),
  /// Any other value; contributes no paths.
  Other(IgnoredAny),
}

/// A single element of a path list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathItemConfig {
  /// A bare path.
  Plain(String),
  /// Paths keyed to their attribute maps.
  Attributed(IndexMap<String, PathAttributes>),
  /// Any other value; contributes no paths.
  Other(IgnoredAny),
}

/// Accepted shapes for a variant option.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariantConfig {
  /// Discriminator mapped to a path list.
  Map(IndexMap<String, PathListConfig>),
  /// Any other value; treated as an empty map.
  Other(IgnoredAny),
}

/// Accepted shapes for name lists such as `dependencies` and `messages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringListConfig {
  /// A single name.
  Single(String),
  /// A list of names.
  List(Vec<String>),
  /// Any other value; treated as an empty list.
  Other(IgnoredAny),
}

/// Fully prefixed path lists of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFiles {
  /// Scripts served in every context.
  pub scripts: PathList,
  /// Scripts keyed by language code.
  pub language_scripts: VariantMap,
  /// Scripts keyed by skin.
  pub skin_scripts: VariantMap,
  /// Debug-only scripts.
  pub debug_scripts: PathList,
  /// Loader stub scripts.
  pub loader_scripts: PathList,
  /// Stylesheets served in every context.
  pub styles: PathList,
  /// Stylesheets keyed by skin.
  pub skin_styles: VariantMap,
}

impl ModuleDefinition {
  /// Resolve every path option under `base_path`, preserving order and entry shape.
  pub fn resolve_files(&self, base_path: &str) -> ModuleFiles {
    ModuleFiles {
      scripts: resolve_list(self.scripts.as_ref(), base_path),
      language_scripts: resolve_variants(self.language_scripts.as_ref(), base_path),
      skin_scripts: resolve_variants(self.skin_scripts.as_ref(), base_path),
      debug_scripts: resolve_list(self.debug_scripts.as_ref(), base_path),
      loader_scripts: resolve_list(self.loader_scripts.as_ref(), base_path),
      styles: resolve_list(self.styles.as_ref(), base_path),
      skin_styles: resolve_variants(self.skin_styles.as_ref(), base_path),
    }
  }

  /// Dependency module names in configured order.
  pub fn dependency_names(&self) -> Vec<String> {
    string_list(self.dependencies.as_ref())
  }

  /// Message keys in configured order.
  pub fn message_keys(&self) -> Vec<String> {
    string_list(self.messages.as_ref())
  }
}

impl PathListConfig {
  /// Flatten the configured shape into unprefixed entries.
  pub fn entries(&self) -> PathList {
    match self {
      Self::Single(path) => vec![PathEntry::Plain(path.clone())],
      Self::List(items) => items.iter().flat_map(PathItemConfig::entries).collect(),
      Self::Attributed(map) => attributed_entries(map),
      Self::Other(_) => Vec::new(),
    }
  }
}

impl PathItemConfig {
  fn entries(&self) -> PathList {
    match self {
      Self::Plain(path) => vec![PathEntry::Plain(path.clone())],
      Self::Attributed(map) => attributed_entries(map),
      Self::Other(_) => Vec::new(),
    }
  }
}

fn attributed_entries(map: &IndexMap<String, PathAttributes>) -> PathList {
  map
    .iter()
    .map(|(path, attributes)| PathEntry::WithAttributes(path.clone(), attributes.clone()))
    .collect()
}

fn resolve_list(config: Option<&PathListConfig>, base_path: &str) -> PathList {
  config
    .map(PathListConfig::entries)
    .unwrap_or_default()
    .into_iter()
    .map(|entry| entry.prefixed(base_path))
    .collect()
}

fn resolve_variants(config: Option<&VariantConfig>, base_path: &str) -> VariantMap {
  match config {
    Some(VariantConfig::Map(map)) => map
      .iter()
      .map(|(key, list)| (key.clone(), resolve_list(Some(list), base_path)))
      .collect(),
    _ => VariantMap::new(),
  }
}

fn string_list(config: Option<&StringListConfig>) -> Vec<String> {
  match config {
    Some(StringListConfig::Single(value)) => vec![value.clone()],
    Some(StringListConfig::List(values)) => values.clone(),
    _ => Vec::new(),
  }
}
