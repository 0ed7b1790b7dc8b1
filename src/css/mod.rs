//! Stylesheet helpers for rewriting and discovering `url()` references.
//!
//! Rewriting and discovery are both expressed as traits so modules can be handed alternative
//! implementations; the regex based defaults in this module cover plain CSS.

mod filters;
mod references;
mod remap;

use regex::Regex;

pub use filters::{normalise_url_path, should_ignore_style_reference, strip_query_and_fragment};
pub use references::{CssReferenceExtractor, StyleReferenceExtractor};
pub use remap::{CssUrlRemapper, StyleRemapper};

/// Matches `url(...)` tokens, capturing the opening quote, the value and the closing quote.
fn url_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"(?i)url\(\s*(['"]?)([^'")]*?)(['"]?)\s*\)"#).expect("invalid url() regex")
  })
}
