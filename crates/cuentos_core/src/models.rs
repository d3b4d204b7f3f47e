use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Sampling parameters forwarded to the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
}

impl SamplingOptions {
    /// Low temperature, short output. Used for summaries.
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.95,
            max_new_tokens: Some(50),
        }
    }

    /// Used for character rosters and scene descriptions.
    pub fn creative() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_new_tokens: None,
        }
    }

    /// Creative sampling with a larger output cap, for full narratives.
    pub fn long_form() -> Self {
        Self {
            max_new_tokens: Some(1024),
            ..Self::creative()
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: Option<u32>) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self::creative()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Black-box text generation. Returns the backend's raw JSON body; callers
/// decide which field carries the text.
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, options: &SamplingOptions) -> Result<serde_json::Value>;
}

/// Black-box image synthesis. Returns encoded image bytes.
#[async_trait]
pub trait ImageGenerator: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn generate_image(&self, prompt: &str, options: &ImageOptions) -> Result<Vec<u8>>;
}
