use async_trait::async_trait;

use crate::Result;

/// Flat key to blob store. Keys are `/`-separated relative paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` under `key`, replacing any previous value.
    async fn put(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Writes `data` under `key`, failing with `Error::Storage` if the key exists.
    async fn put_new(&self, key: &str, data: &[u8]) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Keys starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
