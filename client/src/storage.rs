//! Durable key/value storage for session state.
//!
//! The session layer persists two keys so a restart can resume a live
//! session: [`IS_LOGGED_IN_KEY`] and [`AUTH_TOKEN_KEY`]. The store is a
//! trait so tests run against an in-memory map while real deployments
//! use a JSON file.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage key holding the literal `"true"` while a session is active.
pub const IS_LOGGED_IN_KEY: &str = "isLoggedIn";

/// Storage key holding the raw bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Errors raised by a session store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("storage content is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Async key/value store for session state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// File-backed store keeping all keys in one JSON object.
///
/// Writes are whole-file: read-modify-write under an internal lock. A
/// missing file reads as an empty map.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        assert!(store.get(AUTH_TOKEN_KEY).await.unwrap().is_none());

        store.set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        assert_eq!(
            store.get(AUTH_TOKEN_KEY).await.unwrap().as_deref(),
            Some("tok")
        );

        store.remove(AUTH_TOKEN_KEY).await.unwrap();
        assert!(store.get(AUTH_TOKEN_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileStore::new(&path);
            store.set(IS_LOGGED_IN_KEY, "true").await.unwrap();
            store.set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        }

        let store = FileStore::new(&path);
        assert_eq!(
            store.get(IS_LOGGED_IN_KEY).await.unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            store.get(AUTH_TOKEN_KEY).await.unwrap().as_deref(),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn test_file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));

        assert!(store.get(AUTH_TOKEN_KEY).await.unwrap().is_none());
        // Removing from a missing file is a no-op, not an error.
        store.remove(AUTH_TOKEN_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_remove_deletes_only_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        store.set(IS_LOGGED_IN_KEY, "true").await.unwrap();
        store.set(AUTH_TOKEN_KEY, "tok").await.unwrap();
        store.remove(AUTH_TOKEN_KEY).await.unwrap();

        assert_eq!(
            store.get(IS_LOGGED_IN_KEY).await.unwrap().as_deref(),
            Some("true")
        );
        assert!(store.get(AUTH_TOKEN_KEY).await.unwrap().is_none());
    }
}
