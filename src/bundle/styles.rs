//! Stylesheet aggregation, media collation and dependency tracking.

use tracing::{debug, warn};

use crate::dependencies::{collect_style_references, update_dependency_record};
use crate::error::Result;
use crate::models::{Context, DEFAULT_MEDIA, MEDIA_OPTION, PathEntry, StyleMap};
use crate::module::ResourceModule;
use crate::selection::{DEFAULT_VARIANT, collate_by_option, select_for_key, unique_paths};

impl ResourceModule {
  /// Generate the stylesheets for `context`, keyed by media type.
  ///
  /// General and skin styles are collated independently and merged with skin content appended
  /// after general content per media type. Local files referenced by the result are recorded
  /// as dependencies for the context's skin; failing to record them does not fail the call.
  pub fn get_styles(&self, context: &Context) -> Result<StyleMap> {
    let general = self.read_styles(&self.files.styles)?;
    let skin_entries =
      select_for_key(&self.files.skin_styles, context.skin(), Some(DEFAULT_VARIANT));
    let skin = self.read_styles(skin_entries)?;

    let styles = merge_style_maps(general, skin);
    debug!(
      module = %self.name,
      fingerprint = context.fingerprint(),
      media_types = styles.len(),
      "generated styles"
    );

    // TODO: move dependency recording out of this accessor once callers can trigger it explicitly.
    self.record_style_dependencies(context, &styles);
    Ok(styles)
  }

  fn read_styles(&self, entries: &[PathEntry]) -> Result<StyleMap> {
    collate_by_option(entries, MEDIA_OPTION, DEFAULT_MEDIA)
      .into_iter()
      .map(|(media, bucket)| -> Result<(String, String)> {
        Ok((media, self.read_stylesheets(&bucket)?))
      })
      .collect()
  }

  fn read_stylesheets(&self, entries: &[PathEntry]) -> Result<String> {
    let contents = unique_paths(entries)
      .into_iter()
      .map(|path| -> Result<String> {
        let location = self.paths.resolve(path);
        let content = self.services.files.read_to_string(&location)?;
        let dir = path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or_default();
        let source_dir = location
          .parent()
          .unwrap_or(self.paths.install_root.as_path());
        Ok(
          self
            .services
            .remapper
            .remap(&content, source_dir, &self.paths.public_dir(dir), true),
        )
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(contents.join("\n"))
  }

  fn record_style_dependencies(&self, context: &Context, styles: &StyleMap) {
    let files = collect_style_references(self.services.extractor.as_ref(), styles);
    if let Err(err) = update_dependency_record(
      self.services.dependencies.as_ref(),
      &self.name,
      context.skin(),
      &files,
    ) {
      warn!(
        module = %self.name,
        skin = context.skin(),
        error = %err,
        "failed to record style dependencies"
      );
    }
  }
}

/// Merge skin styles into general styles, appending skin content per media type.
pub fn merge_style_maps(general: StyleMap, skin: StyleMap) -> StyleMap {
  let mut merged = general;
  for (media, content) in skin {
    merged.entry(media).or_default().push_str(&content);
  }
  merged
}
