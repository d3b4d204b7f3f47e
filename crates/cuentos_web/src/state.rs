use std::sync::Arc;

use cuentos_core::BlobStore;
use cuentos_inference::StoryPipeline;
use cuentos_scrappers::ExtractorManager;
use cuentos_storage::{DocumentCache, StoryArchive};

pub struct AppState {
    pub pipeline: StoryPipeline,
    pub extractor: ExtractorManager,
    pub documents: DocumentCache,
    pub archive: StoryArchive,
}

impl AppState {
    /// Documents and stories share one store under their own prefixes.
    pub fn new(pipeline: StoryPipeline, extractor: ExtractorManager, store: Arc<dyn BlobStore>) -> Self {
        Self {
            pipeline,
            extractor,
            documents: DocumentCache::new(store.clone()),
            archive: StoryArchive::new(store),
        }
    }
}
