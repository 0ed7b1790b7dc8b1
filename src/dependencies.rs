//! Persistence of files discovered inside generated stylesheets.
//!
//! Stylesheets may pull in images and fonts that are not listed in any module definition.
//! Those references are recorded per (module, skin) so that freshness checks can include them.
//! Records are only rewritten when the discovered list actually changes.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::css::StyleReferenceExtractor;
use crate::error::{BundleError, Result};
use crate::models::{DependencyRecord, StyleMap};

/// Keyed storage for dependency records with replace-on-write semantics.
pub trait DependencyStore: Send + Sync {
  /// Stored file list for the module and skin, if any.
  fn get(&self, module: &str, skin: &str) -> Result<Option<Vec<String>>>;

  /// Replace the file list stored for the module and skin.
  fn put(&self, module: &str, skin: &str, files: &[String]) -> Result<()>;
}

type RecordKey = (String, String);

/// In-process store, useful for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryDependencyStore {
  records: Mutex<BTreeMap<RecordKey, Vec<String>>>,
  writes: AtomicUsize,
}

impl MemoryDependencyStore {
  /// Number of `put` calls performed so far.
  pub fn write_count(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }

  /// Snapshot of every stored record, ordered by key.
  pub fn records(&self) -> Vec<DependencyRecord> {
    let records = self.records.lock().unwrap_or_else(|poison| poison.into_inner());
    records
      .iter()
      .map(|((module, skin), files)| DependencyRecord {
        module: module.clone(),
        skin: skin.clone(),
        files: files.clone(),
      })
      .collect()
  }
}

impl DependencyStore for MemoryDependencyStore {
  fn get(&self, module: &str, skin: &str) -> Result<Option<Vec<String>>> {
    let records = self.records.lock().unwrap_or_else(|poison| poison.into_inner());
    Ok(records.get(&(module.to_string(), skin.to_string())).cloned())
  }

  fn put(&self, module: &str, skin: &str, files: &[String]) -> Result<()> {
    let mut records = self.records.lock().unwrap_or_else(|poison| poison.into_inner());
    records.insert((module.to_string(), skin.to_string()), files.to_vec());
    self.writes.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

/// Records of the JSON document: module name, then skin, then referenced files.
type RecordDocument = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Serialises document rewrites across every `JsonDependencyStore` in the process.
static DOCUMENT_LOCK: Mutex<()> = Mutex::new(());

/// Store backed by a single JSON document of `{"module": {"skin": [files]}}` entries.
///
/// Every write rewrites the document through a uniquely named sibling temporary file followed
/// by a rename, so readers never observe a half-written file. Within one process, writes to
/// different keys never lose each other. Across processes, the last writer of the whole
/// document wins.
#[derive(Debug)]
pub struct JsonDependencyStore {
  path: PathBuf,
}

impl JsonDependencyStore {
  /// Store persisting to `path`. The file is created on first write.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Location of the backing document.
  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self, module: &str, skin: &str) -> Result<RecordDocument> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
      Err(err) => return Err(BundleError::io(&self.path, err)),
    };
    if content.trim().is_empty() {
      return Ok(BTreeMap::new());
    }
    serde_json::from_str(&content).map_err(|err| BundleError::store(module, skin, err))
  }

  fn write(&self, module: &str, skin: &str, records: &RecordDocument) -> Result<()> {
    let serialised =
      serde_json::to_string_pretty(records).map_err(|err| BundleError::store(module, skin, err))?;
    let dir = self
      .path
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .unwrap_or(Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| BundleError::io(dir, err))?;
    temp
      .write_all(serialised.as_bytes())
      .map_err(|err| BundleError::io(temp.path(), err))?;
    temp
      .persist(&self.path)
      .map_err(|err| BundleError::io(&self.path, err.error))?;
    Ok(())
  }
}

impl DependencyStore for JsonDependencyStore {
  fn get(&self, module: &str, skin: &str) -> Result<Option<Vec<String>>> {
    let _guard = DOCUMENT_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
    let mut records = self.load(module, skin)?;
    Ok(records.get_mut(module).and_then(|skins| skins.remove(skin)))
  }

  fn put(&self, module: &str, skin: &str, files: &[String]) -> Result<()> {
    let _guard = DOCUMENT_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
    let mut records = self.load(module, skin)?;
    records
      .entry(module.to_string())
      .or_default()
      .insert(skin.to_string(), files.to_vec());
    self.write(module, skin, &records)
  }
}

/// Every local file referenced by the generated styles, deduplicated across media types.
pub fn collect_style_references(
  extractor: &dyn StyleReferenceExtractor,
  styles: &StyleMap,
) -> Vec<String> {
  let mut seen = BTreeSet::new();
  styles
    .values()
    .flat_map(|content| extractor.extract(content))
    .filter(|path| seen.insert(path.clone()))
    .collect()
}

/// Store `files` for the module and skin unless the stored record already matches.
///
/// Returns whether a write happened.
pub fn update_dependency_record(
  store: &dyn DependencyStore,
  module: &str,
  skin: &str,
  files: &[String],
) -> Result<bool> {
  if store.get(module, skin)?.as_deref() == Some(files) {
    debug!(module, skin, "style dependency record unchanged");
    return Ok(false);
  }

  store.put(module, skin, files)?;
  info!(module, skin, count = files.len(), "stored style dependency record");
  Ok(true)
}
