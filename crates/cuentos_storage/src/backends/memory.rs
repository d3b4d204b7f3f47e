use std::collections::BTreeMap;

use async_trait::async_trait;
use cuentos_core::{BlobStore, Error, Result};
use tokio::sync::RwLock;

use super::validate_key;

#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.blobs.write().await.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn put_new(&self, key: &str, data: &[u8]) -> Result<()> {
        validate_key(key)?;
        let mut blobs = self.blobs.write().await;
        if blobs.contains_key(key) {
            return Err(Error::Storage(format!("key already exists: {}", key)));
        }
        blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .blobs
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
