use regex::Regex;

fn style_reference_ignores() -> &'static [Regex] {
  use std::sync::OnceLock;

  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://").expect("invalid scheme regex"),
        Regex::new(r"^//").expect("invalid protocol-relative regex"),
        Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
        Regex::new(r"^#").expect("invalid fragment regex"),
      ]
    })
    .as_slice()
}

/// Determine whether a stylesheet `url()` value points outside the local file tree.
///
/// Remote URLs, protocol-relative URLs, data URIs and bare fragments are never rewritten or
/// tracked as file dependencies.
pub fn should_ignore_style_reference(value: &str) -> bool {
  value.is_empty()
    || style_reference_ignores()
      .iter()
      .any(|pattern| pattern.is_match(value))
}

/// Collapse `.` and `..` segments and repeated slashes in a URL path.
pub fn normalise_url_path(value: &str) -> String {
  let absolute = value.starts_with('/');
  let mut segments: Vec<&str> = Vec::new();

  for segment in value.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if segments.last().is_some_and(|last| *last != "..") {
          segments.pop();
        } else if !absolute {
          segments.push("..");
        }
      }
      other => segments.push(other),
    }
  }

  let joined = segments.join("/");
  if absolute { format!("/{joined}") } else { joined }
}

/// Drop any query string or fragment from a URL value.
pub fn strip_query_and_fragment(value: &str) -> &str {
  value
    .split_once(['?', '#'])
    .map(|(path, _)| path)
    .unwrap_or(value)
}
