//! Script aggregation for a request context.

use tracing::debug;

use crate::error::Result;
use crate::models::{Context, PathEntry};
use crate::module::ResourceModule;
use crate::selection::{DEFAULT_VARIANT, select_for_key, unique_paths};

impl ResourceModule {
  /// Concatenate the scripts that apply to `context`.
  ///
  /// General, language and skin scripts are joined by newlines; in debug contexts the debug
  /// scripts follow after a blank line.
  pub fn get_script(&self, context: &Context) -> Result<String> {
    let files = &self.files;
    let language = select_for_key(&files.language_scripts, context.language(), None);
    let skin = select_for_key(&files.skin_scripts, context.skin(), Some(DEFAULT_VARIANT));

    let mut script = [
      self.read_scripts(&files.scripts)?,
      self.read_scripts(language)?,
      self.read_scripts(skin)?,
    ]
    .join("\n");

    if context.debug() {
      script.push_str("\n\n");
      script.push_str(&self.read_scripts(&files.debug_scripts)?);
    }

    debug!(
      module = %self.name,
      fingerprint = context.fingerprint(),
      bytes = script.len(),
      "generated script"
    );
    Ok(script)
  }

  /// Loader stub content, or `None` when the module configures no loader scripts.
  pub fn get_loader_script(&self) -> Result<Option<String>> {
    if self.files.loader_scripts.is_empty() {
      return Ok(None);
    }
    self.read_scripts(&self.files.loader_scripts).map(Some)
  }

  fn read_scripts(&self, entries: &[PathEntry]) -> Result<String> {
    let contents = unique_paths(entries)
      .into_iter()
      .map(|path| self.services.files.read_to_string(&self.paths.resolve(path)))
      .collect::<Result<Vec<_>>>()?;
    Ok(contents.join("\n"))
  }
}
