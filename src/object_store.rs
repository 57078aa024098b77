//! Object store adapter: put/get/delete opaque blobs by content-addressed key.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("key not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ObjectStoreError>;

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
    async fn delete(&self, key: &str) -> Result<()>;
    /// A time-boxed, signed path the caller can hand to a client for direct
    /// reads. There is no object-storage service reachable from this crate, so
    /// this is simulated as a token over the key rather than a true presigned URL.
    fn presigned_url(&self, key: &str, expires_in_secs: u64) -> String;
}

/// Filesystem-backed object store rooted at `documents_dir`, mirroring the
/// teacher's convention of a single configured documents directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Content-addressed key for sanitised bytes: `documents/<sha256>.pdf`.
    pub fn content_key(bytes: &[u8], extension: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = hex::encode(hasher.finalize());
        format!("documents/{hash}.{extension}")
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        fs::read(&path)
            .await
            .map_err(|_| ObjectStoreError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn presigned_url(&self, key: &str, expires_in_secs: u64) -> String {
        let expires_at = Utc::now().timestamp() as u64 + expires_in_secs;
        format!("/blobs/{key}?expires={expires_at}")
    }
}

pub fn is_within_root(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_key_is_stable_for_identical_bytes() {
        let a = FsObjectStore::content_key(b"hello world", "pdf");
        let b = FsObjectStore::content_key(b"hello world", "pdf");
        assert_eq!(a, b);
        assert!(a.starts_with("documents/"));
        assert!(a.ends_with(".pdf"));
    }

    #[test]
    fn content_key_differs_for_different_bytes() {
        let a = FsObjectStore::content_key(b"hello", "pdf");
        let b = FsObjectStore::content_key(b"world", "pdf");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn put_get_delete_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.put("documents/a.pdf", b"data").await.unwrap();
        assert_eq!(store.get("documents/a.pdf").await.unwrap(), b"data");
        store.delete("documents/a.pdf").await.unwrap();
        assert!(store.get("documents/a.pdf").await.is_err());
    }
}
