//! Storage abstractions for the seen-set.
//!
//! The seen-set is the only state kept between runs: a JSON array of the
//! most recently reported notice ids.
//!
//! ```text
//! data/
//! └── estado.json   # ["301230", "301231", ...]
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SeenSet;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for seen-set storage backends.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Load the seen-set, empty if nothing has been stored yet.
    async fn load(&self) -> Result<SeenSet>;

    /// Replace the stored seen-set.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

/// Reads through to another store and discards writes (dry runs).
pub struct ReadOnly<S>(pub S);

#[async_trait]
impl<S: SeenStore> SeenStore for ReadOnly<S> {
    async fn load(&self) -> Result<SeenSet> {
        self.0.load().await
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        log::info!("Dry run: not saving {} seen ids", seen.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_only_discards_writes() {
        let tmp = TempDir::new().unwrap();
        let inner = LocalStorage::new(tmp.path().join("estado.json"));
        inner.save(&SeenSet::from_iter(["1"])).await.unwrap();

        let store = ReadOnly(inner.clone());
        assert_eq!(store.load().await.unwrap().len(), 1);

        store.save(&SeenSet::from_iter(["1", "2"])).await.unwrap();
        assert_eq!(inner.load().await.unwrap().len(), 1);
    }
}
