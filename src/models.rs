//! Data structures shared by module resolution, aggregation and freshness tracking.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

/// Attribute map attached to a path entry. Only `media` is interpreted.
pub type PathAttributes = BTreeMap<String, String>;

/// Ordered list of resolved path entries.
pub type PathList = Vec<PathEntry>;

/// Discriminator (language code or skin name) mapped to the paths it selects.
pub type VariantMap = IndexMap<String, PathList>;

/// Generated stylesheet text keyed by media type, in first-seen order.
pub type StyleMap = IndexMap<String, String>;

/// Name of the attribute used to collate stylesheets.
pub const MEDIA_OPTION: &str = "media";

/// Bucket receiving stylesheets that do not name a media type.
pub const DEFAULT_MEDIA: &str = "all";

/// A single configured file, optionally annotated with attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
  /// A bare path.
  Plain(String),
  /// A path paired with its attribute map.
  WithAttributes(String, PathAttributes),
}

impl PathEntry {
  /// Path of the entry regardless of variant.
  pub fn path(&self) -> &str {
    match self {
      Self::Plain(path) | Self::WithAttributes(path, _) => path,
    }
  }

  /// Value of the named attribute, if the entry carries one.
  pub fn attribute(&self, name: &str) -> Option<&str> {
    match self {
      Self::Plain(_) => None,
      Self::WithAttributes(_, attributes) => attributes.get(name).map(String::as_str),
    }
  }

  /// Return the entry with its path placed under `base`, keeping the variant and attributes.
  pub fn prefixed(self, base: &str) -> Self {
    match self {
      Self::Plain(path) => Self::Plain(prefix_path(base, &path)),
      Self::WithAttributes(path, attributes) => {
        Self::WithAttributes(prefix_path(base, &path), attributes)
      }
    }
  }
}

impl From<&str> for PathEntry {
  fn from(path: &str) -> Self {
    Self::Plain(path.to_string())
  }
}

/// Join a base path and a configured path with a single forward slash.
///
/// Backslashes become forward slashes. A root base (`/`) keeps the result rooted; an empty
/// base leaves the path unchanged.
pub fn prefix_path(base: &str, path: &str) -> String {
  let path = path.replace('\\', "/");
  if base.is_empty() {
    return path;
  }

  let base = base.replace('\\', "/");
  format!(
    "{}/{}",
    base.trim_end_matches('/'),
    path.trim_start_matches('/')
  )
}

/// Request context selecting which variant files apply.
///
/// The fingerprint is the memoization key for freshness lookups and must change whenever any
/// resolution-relevant field changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context {
  language: String,
  skin: String,
  debug: bool,
  fingerprint: String,
}

impl Context {
  /// Build a context whose fingerprint summarises language, skin and debug flag.
  ///
  /// Each text field is length-prefixed so that separators inside a value cannot make two
  /// contexts share a fingerprint.
  pub fn new(language: impl Into<String>, skin: impl Into<String>, debug: bool) -> Self {
    let language = language.into();
    let skin = skin.into();
    let fingerprint = format!(
      "{}:{language}|{}:{skin}|{}",
      language.len(),
      skin.len(),
      u8::from(debug)
    );
    Self {
      language,
      skin,
      debug,
      fingerprint,
    }
  }

  /// Replace the derived fingerprint, for callers that track extra resolution state.
  pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
    self.fingerprint = fingerprint.into();
    self
  }

  /// Requested language code.
  pub fn language(&self) -> &str {
    &self.language
  }

  /// Requested skin identifier.
  pub fn skin(&self) -> &str {
    &self.skin
  }

  /// Whether debug-only scripts should be included.
  pub fn debug(&self) -> bool {
    self.debug
  }

  /// Stable cache key for this context.
  pub fn fingerprint(&self) -> &str {
    &self.fingerprint
  }
}

/// Persisted list of files referenced from generated styles for one module and skin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
  /// Module the record belongs to.
  pub module: String,
  /// Skin the styles were generated for.
  pub skin: String,
  /// Referenced files, install-root relative.
  pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefixes_plain_and_attributed_entries_alike() {
    let plain = PathEntry::from("main.css").prefixed("skins/vector");
    assert_eq!(plain, PathEntry::Plain("skins/vector/main.css".into()));

    let attributes = PathAttributes::from([("media".to_string(), "print".to_string())]);
    let attributed =
      PathEntry::WithAttributes("print.css".into(), attributes.clone()).prefixed("skins/vector/");
    assert_eq!(
      attributed,
      PathEntry::WithAttributes("skins/vector/print.css".into(), attributes)
    );
    assert_eq!(attributed.attribute(MEDIA_OPTION), Some("print"));
  }

  #[test]
  fn empty_base_leaves_paths_untouched() {
    assert_eq!(prefix_path("", "a.js"), "a.js");
  }

  #[test]
  fn root_base_keeps_paths_rooted() {
    assert_eq!(prefix_path("/", "a.js"), "/a.js");
    assert_eq!(prefix_path("/", "/a.js"), "/a.js");
  }

  #[test]
  fn backslashes_are_normalised_with_or_without_base() {
    assert_eq!(prefix_path("", "scripts\\core.js"), "scripts/core.js");
    assert_eq!(prefix_path("modules\\site", "core.js"), "modules/site/core.js");
    assert_eq!(prefix_path("modules/site", "lib\\core.js"), "modules/site/lib/core.js");
  }

  #[test]
  fn fingerprint_tracks_every_dimension() {
    let base = Context::new("en", "vector", false);
    assert_ne!(base.fingerprint(), Context::new("de", "vector", false).fingerprint());
    assert_ne!(base.fingerprint(), Context::new("en", "monobook", false).fingerprint());
    assert_ne!(base.fingerprint(), Context::new("en", "vector", true).fingerprint());
    assert_eq!(base.fingerprint(), Context::new("en", "vector", false).fingerprint());
  }

  #[test]
  fn separators_inside_values_do_not_collide() {
    let first = Context::new("a|skin=b", "c", false);
    let second = Context::new("a", "b|skin=c", false);
    assert_ne!(first.fingerprint(), second.fingerprint());

    let third = Context::new("a:1", "b", true);
    let fourth = Context::new("a", "1|b", true);
    assert_ne!(third.fingerprint(), fourth.fingerprint());
  }

  #[test]
  fn custom_fingerprint_overrides_derived_one() {
    let context = Context::new("en", "vector", false).with_fingerprint("v2");
    assert_eq!(context.fingerprint(), "v2");
    assert_eq!(context.skin(), "vector");
  }
}
