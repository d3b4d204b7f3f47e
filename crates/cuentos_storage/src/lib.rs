use std::path::Path;
use std::sync::Arc;

use cuentos_core::{BlobStore, Error, Result};

pub mod backends;
pub mod documents;
pub mod stories;

pub use backends::*;
pub use documents::{DocumentCache, DocumentKey};
pub use stories::StoryArchive;

/// Builds a store by backend name: `memory` or `filesystem` (rooted at `base_path`).
pub fn create_store(kind: &str, base_path: &Path) -> Result<Arc<dyn BlobStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "filesystem" | "fs" => Ok(Arc::new(FileSystemStore::new(base_path)?)),
        other => Err(Error::Config(format!(
            "unknown storage backend '{}', expected memory or filesystem",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{create_store, DocumentCache, DocumentKey, StoryArchive};
    pub use super::backends::*;
}
