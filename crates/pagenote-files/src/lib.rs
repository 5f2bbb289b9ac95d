//! File-based storage for pagenote.
//!
//! Each storage key is one JSON file in a directory:
//!
//! ```text
//! notes/
//!   .lock               # Lock file for read-modify-write cycles
//!   page_notes.json     # Blob for the "page_notes" key
//! ```

use fs2::FileExt;
use pagenote_core::{Error, Storage};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Directory-backed [`Storage`].
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open a storage directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| Error::Storage(format!("Failed to create storage dir: {}", e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize(key)))
    }

    /// Acquire an exclusive lock on the directory.
    ///
    /// Held across a whole read-modify-write cycle so concurrent processes
    /// sharing the directory don't lose each other's changes.
    pub fn lock(&self) -> Result<FileLock, Error> {
        let lock_path = self.root.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| Error::Storage(format!("Failed to open lock file: {}", e)))?;

        file.lock_exclusive()
            .map_err(|e| Error::Storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!("Failed to read {}: {}", key, e))),
        }
    }

    /// Write atomically via a temp file and rename.
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key);
        let temp_path = self.root.join(format!("{}.json.tmp", sanitize(key)));

        let mut file = File::create(&temp_path)
            .map_err(|e| Error::Storage(format!("Failed to create temp file: {}", e)))?;

        file.write_all(value.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to write temp file: {}", e)))?;

        file.sync_all()
            .map_err(|e| Error::Storage(format!("Failed to sync temp file: {}", e)))?;

        fs::rename(&temp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to rename temp file: {}", e)))?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote blob");
        Ok(())
    }
}

/// RAII guard for file locking.
pub struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Keep keys from escaping the storage directory.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagenote_core::{NoteStore, DEFAULT_STORAGE_KEY};
    use pretty_assertions::assert_eq;
    use std::thread;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("notes")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_temp, storage) = setup();
        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let (_temp, storage) = setup();
        storage.set("page_notes", r#"{"/x":[]}"#).unwrap();

        assert_eq!(storage.get("page_notes").unwrap().as_deref(), Some(r#"{"/x":[]}"#));
        assert!(storage.path_for("page_notes").ends_with("page_notes.json"));
        assert!(!storage.root().join("page_notes.json.tmp").exists());
    }

    #[test]
    fn test_keys_stay_inside_root() {
        let (_temp, storage) = setup();
        let path = storage.path_for("../escape/key");
        assert_eq!(path.parent(), Some(storage.root()));
    }

    #[test]
    fn test_note_store_over_files() {
        let (temp, storage) = setup();
        let store = NoteStore::new(storage);
        let note = store.create("/docs/intro", "persisted").unwrap();

        let reopened = NoteStore::new(FileStorage::open(temp.path().join("notes")).unwrap());
        assert_eq!(reopened.get_for_page("/docs/intro"), vec![note]);
    }

    #[test]
    fn test_concurrent_creates_with_lock() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("notes");
        FileStorage::open(&root).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let root = root.clone();
                thread::spawn(move || {
                    let storage = FileStorage::open(&root).unwrap();
                    let _lock = storage.lock().unwrap();
                    NoteStore::new(storage)
                        .create("/x", &format!("note {}", i))
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let store = NoteStore::new(FileStorage::open(&root).unwrap());
        assert_eq!(store.get_for_page("/x").len(), 8);
    }
}
