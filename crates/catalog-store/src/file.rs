use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{KvBackend, KvOp};

/// File-backed key-value backend.
///
/// All entries live in one JSON object on disk:
///
/// ```text
/// { "cardapio-overlay-v1": "[...]", "cardapio-deleted-v1": "[...]" }
/// ```
///
/// Every batch rewrites the whole document into a temporary file in the
/// same directory and renames it over the original, so a crash leaves
/// either the old document or the new one. A missing file reads as empty;
/// an unparsable one is logged and read as empty, and the next successful
/// write replaces it.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Open a backend at `path`, creating the parent directory if needed.
    ///
    /// The document itself is only created on first write.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<BTreeMap<String, String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %e, "overlay document is not UTF-8, reading as empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&text) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt overlay document, reading as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_document(&self, doc: &BTreeMap<String, String>) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut doc = self.read_document()?;
        Ok(doc.remove(key))
    }

    fn apply(&self, batch: &[KvOp]) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;

        let mut doc = self.read_document()?;
        for op in batch {
            match op {
                KvOp::Put { key, value } => {
                    doc.insert(key.clone(), value.clone());
                }
                KvOp::Remove { key } => {
                    doc.remove(key);
                }
            }
        }
        self.write_document(&doc)?;
        debug!(path = %self.path.display(), ops = batch.len(), keys = doc.len(), "overlay document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_backend() -> (tempfile::TempDir, FileBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("state").join("overlay.json")).unwrap();
        (dir, backend)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, kv) = temp_backend();
        assert_eq!(kv.get("anything").unwrap(), None);
        assert!(!kv.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let (dir, kv) = temp_backend();
        kv.apply(&[KvOp::put("a", "[1]"), KvOp::put("b", "[2]")]).unwrap();
        drop(kv);

        let reopened = FileBackend::open(dir.path().join("state").join("overlay.json")).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("[1]"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn remove_deletes_key() {
        let (_dir, kv) = temp_backend();
        kv.put("a", "x").unwrap();
        kv.remove("a").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);
    }

    #[test]
    fn corrupt_document_reads_as_empty_and_heals() {
        let (_dir, kv) = temp_backend();
        fs::write(kv.path(), "{ not json").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);

        kv.put("a", "ok").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("ok"));
        let text = fs::read_to_string(kv.path()).unwrap();
        assert!(serde_json::from_str::<BTreeMap<String, String>>(&text).is_ok());
    }

    #[test]
    fn non_utf8_document_reads_as_empty_and_heals() {
        let (_dir, kv) = temp_backend();
        fs::write(kv.path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();
        assert_eq!(kv.get("a").unwrap(), None);

        kv.put("a", "ok").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (_dir, kv) = temp_backend();
        kv.put("a", "1").unwrap();
        kv.put("b", "2").unwrap();
        let parent = kv.path().parent().unwrap();
        let names: Vec<_> = fs::read_dir(parent)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("overlay.json")]);
    }
}
