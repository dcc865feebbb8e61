//! Raw document storage.
//!
//! A backend moves whole documents by collection name and knows nothing
//! about their contents. [`JsonFileStore`] keeps one `<name>.json` file per
//! collection; [`MemoryBackend`] keeps them in a map for tests.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::RepositoryError;

/// Whole-document storage for named collections.
pub trait DocumentBackend: Send + Sync + std::fmt::Debug {
    /// Read a document. `Ok(None)` means it does not exist yet.
    ///
    /// # Errors
    ///
    /// Any other read failure.
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replace a document atomically: readers see the old or the new
    /// content, never a mix.
    ///
    /// # Errors
    ///
    /// Any write failure; the previous document is left in place.
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()>;

    /// Keep a copy of an unparseable document aside. Returns where it went.
    ///
    /// # Errors
    ///
    /// Any copy failure.
    fn quarantine(&self, name: &str) -> io::Result<String>;
}

/// Collections stored as pretty-printed JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| RepositoryError::Io {
            collection: "data directory",
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `name`.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

/// `<path>` with `suffix` appended to the file name.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

impl DocumentBackend for JsonFileStore {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path(name);
        let tmp = with_suffix(&path, ".tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)
    }

    fn quarantine(&self, name: &str) -> io::Result<String> {
        let path = self.path(name);
        let target = with_suffix(&path, ".corrupt");
        fs::copy(&path, &target)?;
        Ok(target.display().to_string())
    }
}

/// In-memory documents.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: Mutex<HashMap<String, Vec<u8>>>,
    unreadable: Vec<String>,
    failing_quarantine: Vec<String>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `name` holding `bytes`.
    #[must_use]
    pub fn with_document(self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), bytes.into());
        self
    }

    /// Make every read of `name` fail.
    #[must_use]
    pub fn with_unreadable(mut self, name: &str) -> Self {
        self.unreadable.push(name.to_string());
        self
    }

    /// Make copying `name` aside fail.
    #[must_use]
    pub fn with_failing_quarantine(mut self, name: &str) -> Self {
        self.failing_quarantine.push(name.to_string());
        self
    }

    /// Current content of a document.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<Vec<u8>> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl DocumentBackend for MemoryBackend {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        if self.unreadable.iter().any(|n| n == name) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{name} is unreadable"),
            ));
        }
        Ok(self.document(name))
    }

    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn quarantine(&self, name: &str) -> io::Result<String> {
        if self.failing_quarantine.iter().any(|n| n == name) {
            return Err(io::Error::new(
                io::ErrorKind::StorageFull,
                format!("{name} cannot be copied"),
            ));
        }
        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        let bytes = documents
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))?;
        let target = format!("{name}.corrupt");
        documents.insert(target.clone(), bytes);
        Ok(target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::create(dir.path()).unwrap();
        assert!(store.read("users").unwrap().is_none());
    }

    #[test]
    fn test_file_store_write_replaces_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::create(dir.path()).unwrap();
        store.write("orders", b"[1]").unwrap();
        store.write("orders", b"[1, 2]").unwrap();
        assert_eq!(store.read("orders").unwrap().unwrap(), b"[1, 2]");
        assert!(!dir.path().join("orders.json.tmp").exists());
    }

    #[test]
    fn test_file_store_quarantine_copies() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::create(dir.path()).unwrap();
        store.write("products", b"{not json").unwrap();
        let target = store.quarantine("products").unwrap();
        assert!(target.ends_with("products.json.corrupt"));
        assert_eq!(
            fs::read(dir.path().join("products.json.corrupt")).unwrap(),
            b"{not json"
        );
    }

    #[test]
    fn test_file_store_unreadable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("users.json")).unwrap();
        let store = JsonFileStore::create(dir.path()).unwrap();
        assert!(store.read("users").is_err());
    }

    #[test]
    fn test_memory_backend_unreadable() {
        let backend = MemoryBackend::new().with_unreadable("users");
        assert!(backend.read("users").is_err());
        assert!(backend.read("orders").unwrap().is_none());
    }
}
