//! Durable audio blob storage for voice intake.
//!
//! Raw audio persistence is best-effort: a storage failure never fails the
//! surrounding transcription, the reference is simply omitted.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use brainvault_core::{new_v7, Error, Result};

/// Storage backend trait for audio blobs.
///
/// Allows abstracting over filesystem, S3, or other storage providers.
#[async_trait]
pub trait AudioStorageBackend: Send + Sync {
    /// Persist a blob under a per-owner key and return a durable reference.
    async fn store(&self, owner: &str, data: &[u8]) -> Result<String>;

    /// Check if a previously returned reference still resolves.
    async fn exists(&self, reference: &str) -> Result<bool>;
}

/// Filesystem audio store.
///
/// Blobs land at `{base_path}/{owner}/{uuidv7}.bin`; the returned reference
/// is that relative path.
pub struct FilesystemAudioStore {
    base_path: PathBuf,
}

impl FilesystemAudioStore {
    /// Create a new filesystem store rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, reference: &str) -> PathBuf {
        self.base_path.join(reference)
    }

    /// Validate that the store can write, read back, and delete a blob.
    ///
    /// Run at startup to catch permission errors and missing directories
    /// before the first upload does.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join(".health-check");
        let test_file = test_dir.join("probe.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"audio-store-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_back = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_back != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await;

        Ok(())
    }

    fn sanitize_owner(owner: &str) -> String {
        owner
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

#[async_trait]
impl AudioStorageBackend for FilesystemAudioStore {
    async fn store(&self, owner: &str, data: &[u8]) -> Result<String> {
        let blob_id: Uuid = new_v7();
        let reference = format!("{}/{}.bin", Self::sanitize_owner(owner), blob_id);
        let full_path = self.full_path(&reference);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("create dir: {}", e)))?;
        }

        fs::write(&full_path, data)
            .await
            .map_err(|e| Error::Storage(format!("write blob: {}", e)))?;

        debug!(
            subsystem = "db",
            component = "audio_storage",
            op = "store",
            reference = %reference,
            size = data.len(),
            "Stored audio blob"
        );
        Ok(reference)
    }

    async fn exists(&self, reference: &str) -> Result<bool> {
        Ok(fs::try_exists(self.full_path(reference))
            .await
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_exists_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAudioStore::new(dir.path());

        let reference = store.store("auth0|abc", b"RIFF....WAVE").await.unwrap();
        assert!(reference.ends_with(".bin"));
        assert!(store.exists(&reference).await.unwrap());

        let data = fs::read(dir.path().join(&reference)).await.unwrap();
        assert_eq!(data, b"RIFF....WAVE");
    }

    #[tokio::test]
    async fn test_owner_key_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAudioStore::new(dir.path());

        let reference = store.store("../../etc/passwd", b"x").await.unwrap();
        assert!(!reference.contains(".."));
        assert!(!reference.starts_with('/'));
        assert!(store.exists(&reference).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_false_for_unknown_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAudioStore::new(dir.path());
        assert!(!store.exists("nobody/none.bin").await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAudioStore::new(dir.path());
        assert!(store.validate().await.is_ok());
    }
}
