use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;

/// String key-value storage holding whole JSON documents.
///
/// Mirrors a browser local storage: one document per key, last write wins.
#[async_trait]
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    /// Read the document stored under `key`
    async fn get_item(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    /// Replace the document stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> Result<(), RepositoryError>;

    /// Delete the document stored under `key`
    async fn remove_item(&self, key: &str) -> Result<(), RepositoryError>;

    /// Short name of the backend, reported by health checks
    fn backend_name(&self) -> &'static str;
}

/// Process-local key-value storage
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryKeyValueStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let items = self.items.lock()?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let mut items = self.items.lock()?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), RepositoryError> {
        let mut items = self.items.lock()?;
        items.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Key-value storage keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    dir: PathBuf,
}

impl FileKeyValueStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::Validation(format!("invalid storage key: {}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileKeyValueStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let path = self.path_for(key)?;
        debug!("Reading storage item from {}", path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Readers must never see a half-written document
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!("Wrote storage item to {}", path.display());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip_and_remove() {
        let storage = InMemoryKeyValueStorage::new();
        assert_eq!(storage.get_item("patient-medications").await.unwrap(), None);

        storage.set_item("patient-medications", "[]").await.unwrap();
        assert_eq!(storage.get_item("patient-medications").await.unwrap().as_deref(), Some("[]"));

        storage.remove_item("patient-medications").await.unwrap();
        assert_eq!(storage.get_item("patient-medications").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_clones_share_items() {
        let storage = InMemoryKeyValueStorage::new();
        let clone = storage.clone();
        storage.set_item("k", "v1").await.unwrap();
        clone.set_item("k", "v2").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_file_storage_persists_documents() {
        let dir = std::env::temp_dir().join(format!("alivia-kv-{}", uuid::Uuid::new_v4()));
        let storage = FileKeyValueStorage::new(&dir);

        assert_eq!(storage.get_item("patient-medications").await.unwrap(), None);
        storage.set_item("patient-medications", r#"[{"id":"1"}]"#).await.unwrap();

        let reopened = FileKeyValueStorage::new(&dir);
        let value = reopened.get_item("patient-medications").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":"1"}]"#));

        reopened.remove_item("patient-medications").await.unwrap();
        reopened.remove_item("patient-medications").await.unwrap();
        assert_eq!(reopened.get_item("patient-medications").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_file_storage_rejects_path_like_keys() {
        let storage = FileKeyValueStorage::new(std::env::temp_dir());
        let result = storage.get_item("../etc/passwd").await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }
}
