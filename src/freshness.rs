//! Modification-time calculation for module contexts.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::Result;
use crate::models::{Context, PathEntry};
use crate::module::ResourceModule;
use crate::selection::{DEFAULT_VARIANT, select_for_key};

impl ResourceModule {
  /// Latest modification time (seconds) of everything that feeds `context`'s output.
  ///
  /// Covers scripts, styles, loader scripts, recorded style dependencies and the language's
  /// translations. Results are memoized per context fingerprint. A file that cannot be stat'ed
  /// fails the whole computation and nothing is cached.
  pub fn get_modified_time(&self, context: &Context) -> Result<u64> {
    if let Some(cached) = self.cached_modified_time(context.fingerprint()) {
      debug!(module = %self.name, fingerprint = context.fingerprint(), "modified time cache hit");
      return Ok(cached);
    }

    let files = self.relevant_files(context)?;
    let mut latest = 0;
    for path in &files {
      latest = latest.max(self.services.files.modified(&self.paths.resolve(path))?);
    }
    let modified = latest.max(self.services.translations.modified_time(context.language()));

    debug!(
      module = %self.name,
      fingerprint = context.fingerprint(),
      files = files.len(),
      modified,
      "computed modified time"
    );

    self
      .modified_times
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .insert(context.fingerprint().to_string(), modified);
    Ok(modified)
  }

  fn cached_modified_time(&self, fingerprint: &str) -> Option<u64> {
    self
      .modified_times
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .get(fingerprint)
      .copied()
  }

  /// Every install-relative path whose change invalidates `context`'s output, deduplicated.
  pub fn relevant_files(&self, context: &Context) -> Result<Vec<String>> {
    let files = &self.files;
    let skin = context.skin();
    let mut entries: Vec<&PathEntry> = files.scripts.iter().collect();
    if context.debug() {
      entries.extend(&files.debug_scripts);
    }
    entries.extend(select_for_key(&files.language_scripts, context.language(), None));
    entries.extend(select_for_key(&files.skin_scripts, skin, Some(DEFAULT_VARIANT)));
    entries.extend(&files.styles);
    entries.extend(select_for_key(&files.skin_styles, skin, Some(DEFAULT_VARIANT)));
    entries.extend(&files.loader_scripts);

    let mut seen = BTreeSet::new();
    let mut paths: Vec<String> = entries
      .into_iter()
      .map(|entry| entry.path().to_string())
      .filter(|path| seen.insert(path.clone()))
      .collect();
    for dependency in self.get_file_dependencies(skin)? {
      if seen.insert(dependency.clone()) {
        paths.push(dependency);
      }
    }
    Ok(paths)
  }
}
