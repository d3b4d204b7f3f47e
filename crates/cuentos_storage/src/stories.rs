use std::sync::Arc;

use cuentos_core::{file_stamp, BlobStore, Error, Result, StoryArtifact};
use tracing::info;

const STORIES_DIR: &str = "historias";
const MAX_SUFFIX: u32 = 1000;

/// Append-only archive of generated stories, one timestamped JSON record each.
#[derive(Clone)]
pub struct StoryArchive {
    store: Arc<dyn BlobStore>,
}

impl StoryArchive {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    fn key_for(artifact: &StoryArtifact, suffix: u32) -> String {
        let stamp = file_stamp(&artifact.created_at);
        if suffix == 0 {
            format!("{}/historia_{}.json", STORIES_DIR, stamp)
        } else {
            format!("{}/historia_{}_{}.json", STORIES_DIR, stamp, suffix)
        }
    }

    /// Writes a new record and returns its key. Existing records are never replaced.
    pub async fn archive(&self, artifact: &StoryArtifact) -> Result<String> {
        let record = serde_json::to_vec_pretty(artifact)?;
        for suffix in 0..MAX_SUFFIX {
            let key = Self::key_for(artifact, suffix);
            match self.store.put_new(&key, &record).await {
                Ok(()) => {
                    info!("📚 Historia guardada en: {}", key);
                    return Ok(key);
                }
                Err(Error::Storage(message)) => {
                    if !self.store.exists(&key).await? {
                        return Err(Error::Storage(message));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::Storage(format!(
            "too many stories archived at {}",
            artifact.created_at
        )))
    }

    pub async fn load(&self, key: &str) -> Result<StoryArtifact> {
        let data = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| Error::NotFound(format!("story '{}'", key)))?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        self.store.list(&format!("{}/", STORIES_DIR)).await
    }
}
