//! Local filesystem storage implementation.
//!
//! Writes go to a sibling temp file which is then renamed over the target,
//! so a crash mid-write never leaves a truncated seen-set behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::SeenSet;
use crate::storage::SeenStore;

/// Seen-set kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a storage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.write_bytes(&bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SeenStore for LocalStorage {
    async fn load(&self) -> Result<SeenSet> {
        match self.read_json::<SeenSet>().await? {
            Some(seen) => {
                log::debug!("Loaded {} seen ids from {}", seen.len(), self.path.display());
                Ok(seen)
            }
            None => {
                log::info!("No state file at {}, starting empty", self.path.display());
                Ok(SeenSet::new())
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        self.write_json(seen).await?;
        log::debug!("Saved {} seen ids to {}", seen.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seen::DEFAULT_CAPACITY;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("estado.json"));

        let seen = storage.load().await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_dir_and_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("estado.json");
        let storage = LocalStorage::new(&path);

        let seen = SeenSet::from_iter(["100", "101"]);
        storage.save(&seen).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"["100","101"]"#);
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(storage.load().await.unwrap(), seen);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_content() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("estado.json"));

        storage.save(&SeenSet::from_iter(["1", "2", "3"])).await.unwrap();
        storage.save(&SeenSet::from_iter(["4"])).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["4"]);
    }

    #[tokio::test]
    async fn test_retention_across_runs() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("estado.json"));

        for run in 0..3 {
            let mut seen = storage.load().await.unwrap();
            seen.record((0..90).map(|i| format!("{run}-{i}")), DEFAULT_CAPACITY);
            storage.save(&seen).await.unwrap();
        }

        let seen = storage.load().await.unwrap();
        assert_eq!(seen.len(), DEFAULT_CAPACITY);
        let ids: Vec<_> = seen.iter().collect();
        assert_eq!(ids[0], "0-70");
        assert_eq!(ids[DEFAULT_CAPACITY - 1], "2-89");
    }

    #[tokio::test]
    async fn test_malformed_state_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("estado.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = LocalStorage::new(&path);
        assert!(matches!(storage.load().await, Err(AppError::Json(_))));
    }
}
