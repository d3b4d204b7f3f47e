pub mod chunker;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod text;
pub mod types;

pub use chunker::{reassemble, Chunker};
pub use error::{Error, Result};
pub use models::{ImageGenerator, ImageOptions, SamplingOptions, TextGenerator};
pub use storage::BlobStore;
pub use types::{
    file_stamp, Article, Character, CharacterRoster, Document, Scene, StageResult, StoryArtifact,
    ROSTER_SIZE, SCENE_COUNT,
};
