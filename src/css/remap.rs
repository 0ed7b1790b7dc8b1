use std::path::Path;

use regex::Captures;

use super::{normalise_url_path, should_ignore_style_reference, url_pattern};

/// Rewrites references inside a stylesheet so it can be served from a different location.
pub trait StyleRemapper: Send + Sync {
  /// Transform `content`, read from `source_dir`, whose files are publicly served at
  /// `public_dir`. With `absolute` set, relative references become public URLs.
  fn remap(&self, content: &str, source_dir: &Path, public_dir: &str, absolute: bool) -> String;
}

/// Rewrites relative `url()` values against the public directory of the stylesheet.
///
/// Root-absolute paths, remote URLs and data URIs are left as authored, and so is everything
/// when absolute rewriting is not requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssUrlRemapper;

impl StyleRemapper for CssUrlRemapper {
  fn remap(&self, content: &str, _source_dir: &Path, public_dir: &str, absolute: bool) -> String {
    if !absolute {
      return content.to_string();
    }

    let public_dir = public_dir.trim_end_matches('/');
    url_pattern()
      .replace_all(content, |caps: &Captures<'_>| {
        let value = caps[2].trim();
        if should_ignore_style_reference(value) || value.starts_with('/') {
          return caps[0].to_string();
        }

        let rewritten = normalise_url_path(&format!("{public_dir}/{value}"));
        format!("url({}{}{})", &caps[1], rewritten, &caps[3])
      })
      .into_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn remap(content: &str) -> String {
    CssUrlRemapper.remap(
      content,
      Path::new("/srv/wiki/skins/vector"),
      "/w/skins/vector",
      true,
    )
  }

  #[test]
  fn rewrites_relative_references() {
    assert_eq!(
      remap(".a { background: url(images/bg.png) no-repeat; }"),
      ".a { background: url(/w/skins/vector/images/bg.png) no-repeat; }"
    );
  }

  #[test]
  fn preserves_quotes_and_collapses_parent_segments() {
    assert_eq!(
      remap(".a { background: url('../common/bg.png'); }"),
      ".a { background: url('/w/skins/common/bg.png'); }"
    );
    assert_eq!(
      remap(r#".a { src: url( "fonts/icons.woff?v=2" ); }"#),
      r#".a { src: url("/w/skins/vector/fonts/icons.woff?v=2"); }"#
    );
  }

  #[test]
  fn leaves_external_and_rooted_references_alone() {
    let css = ".a { background: url(https://cdn.example/x.png); } \
.b { background: url(data:image/gif;base64,R0lGOD); } .c { background: url(/static/c.png); }";
    assert_eq!(remap(css), css);
  }

  #[test]
  fn skips_rewriting_when_not_requested() {
    let css = ".a { background: url(images/bg.png); }";
    let output = CssUrlRemapper.remap(css, Path::new("."), "/w/skins/vector", false);
    assert_eq!(output, css);
  }
}
