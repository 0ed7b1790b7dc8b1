use std::collections::BTreeSet;

use super::{normalise_url_path, should_ignore_style_reference, strip_query_and_fragment, url_pattern};

/// Discovers the local files a generated stylesheet refers to.
pub trait StyleReferenceExtractor: Send + Sync {
  /// Install-root relative paths referenced by `content`, without duplicates.
  fn extract(&self, content: &str) -> Vec<String>;
}

/// Collects local `url()` references, mapping public URLs back onto the install root.
#[derive(Debug, Clone)]
pub struct CssReferenceExtractor {
  public_prefix: String,
}

impl CssReferenceExtractor {
  /// Extractor for stylesheets whose files are served below `public_base_path`.
  pub fn new(public_base_path: &str) -> Self {
    Self {
      public_prefix: format!("{}/", public_base_path.trim_end_matches('/')),
    }
  }

  fn local_path(&self, value: &str) -> Option<String> {
    let value = strip_query_and_fragment(value.trim());
    if should_ignore_style_reference(value) {
      return None;
    }

    let path = if value.starts_with('/') {
      value.strip_prefix(self.public_prefix.as_str())?
    } else {
      value
    };

    let normalised = normalise_url_path(path);
    (!normalised.is_empty()).then_some(normalised)
  }
}

impl StyleReferenceExtractor for CssReferenceExtractor {
  fn extract(&self, content: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    url_pattern()
      .captures_iter(content)
      .filter_map(|caps| self.local_path(&caps[2]))
      .filter(|path| seen.insert(path.clone()))
      .collect()
  }
}
