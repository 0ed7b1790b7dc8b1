//! Helpers used to pick the variant path lists that apply to a request context.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::models::{PathEntry, PathList, VariantMap};

/// Fallback discriminator consulted when a skin has no dedicated entry.
pub const DEFAULT_VARIANT: &str = "default";

/// Return the paths stored under `key`, falling back to `fallback` when given.
///
/// Missing keys yield an empty list rather than an error so that contexts naming an unknown
/// language or skin simply contribute nothing.
pub fn select_for_key<'a>(
  variants: &'a VariantMap,
  key: &str,
  fallback: Option<&str>,
) -> &'a [PathEntry] {
  if let Some(paths) = variants.get(key) {
    return paths;
  }

  fallback
    .and_then(|fallback| variants.get(fallback))
    .map(Vec::as_slice)
    .unwrap_or_default()
}

/// Group entries into buckets named by their `option` attribute.
///
/// Plain entries, and attributed entries lacking the option, land in `default_bucket`. Buckets
/// appear in first-seen order and keep the input order of their entries.
pub fn collate_by_option(
  paths: &[PathEntry],
  option: &str,
  default_bucket: &str,
) -> IndexMap<String, PathList> {
  let mut buckets: IndexMap<String, PathList> = IndexMap::new();
  for entry in paths {
    let bucket = entry.attribute(option).unwrap_or(default_bucket);
    buckets
      .entry(bucket.to_string())
      .or_default()
      .push(entry.clone());
  }
  buckets
}

/// File paths of `entries` with later duplicates removed.
pub fn unique_paths<'a>(entries: impl IntoIterator<Item = &'a PathEntry>) -> Vec<&'a str> {
  let mut seen = BTreeSet::new();
  entries
    .into_iter()
    .map(PathEntry::path)
    .filter(|path| seen.insert(*path))
    .collect()
}
