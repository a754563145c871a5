//! Automerge document storage for shopping list values.

use automerge::{transaction::Transactable, AutoCommit, ReadDoc, ROOT};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Key-value store backed by one Automerge document on disk.
///
/// The document is loaded once when the store is opened. Every `set`
/// writes the key into the root map and saves the whole document, so a
/// value is durable as soon as `set` returns.
pub struct DocumentStore {
    data_dir: PathBuf,
    doc: AutoCommit,
}

impl DocumentStore {
    /// File name of the document inside the data directory.
    pub const FILENAME: &'static str = "shopping.automerge";

    /// Opens the document in `data_dir`, or starts an empty one if the file
    /// doesn't exist yet. The directory is created on first save.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let path = data_dir.join(Self::FILENAME);

        let doc = match fs::read(&path) {
            Ok(bytes) => AutoCommit::load(&bytes).map_err(|e| StoreError::Load {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => AutoCommit::new(),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };

        Ok(Self { data_dir, doc })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path of the document file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(Self::FILENAME)
    }

    /// Keys currently present in the document.
    pub fn keys(&self) -> Vec<String> {
        self.doc.keys(ROOT).collect()
    }

    fn save(&mut self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Io {
            path: self.data_dir.clone(),
            source: e,
        })?;

        let path = self.path();
        let bytes = self.doc.save();
        fs::write(&path, bytes).map_err(|e| StoreError::Io { path, source: e })
    }
}

impl KeyValueStore for DocumentStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self
            .doc
            .get(ROOT, key)
            .map_err(|e| StoreError::Automerge(e.to_string()))?
        {
            Some((value, _)) => Ok(value.into_string().ok()),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.doc
            .put(ROOT, key, value)
            .map_err(|e| StoreError::Automerge(e.to_string()))?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (DocumentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::open(temp_dir.path().to_path_buf()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_nonexistent_is_empty() {
        let (store, _temp) = test_store();
        assert!(store.keys().is_empty());
        assert_eq!(store.get("shopping.items").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let mut store = DocumentStore::open(nested_dir.clone()).unwrap();

        store.set("k", "v").unwrap();

        assert!(nested_dir.join(DocumentStore::FILENAME).exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let (mut store, temp) = test_store();
        store.set("shopping.stores", r#"["Store A"]"#).unwrap();
        store.set("shopping.removed", "[]").unwrap();
        drop(store);

        let reopened = DocumentStore::open(temp.path().to_path_buf()).unwrap();
        assert_eq!(
            reopened.get("shopping.stores").unwrap(),
            Some(r#"["Store A"]"#.to_string())
        );
        let mut keys = reopened.keys();
        keys.sort();
        assert_eq!(keys, vec!["shopping.removed", "shopping.stores"]);
    }

    #[test]
    fn test_overwrite_existing_value() {
        let (mut store, temp) = test_store();
        store.set("version", "1").unwrap();
        store.set("version", "2").unwrap();

        let reopened = DocumentStore::open(temp.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get("version").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_open_corrupt_document_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DocumentStore::FILENAME), b"not automerge").unwrap();

        let result = DocumentStore::open(temp_dir.path().to_path_buf());
        assert!(matches!(result, Err(StoreError::Load { .. })));
    }
}
