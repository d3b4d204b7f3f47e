use std::fmt;

use cuentos_core::{ImageGenerator, ImageOptions, Result, SamplingOptions, TextGenerator};
use serde_json::{json, Value};

/// Offline text backend: echoes the first words of the prompt.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextGenerator for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str, _options: &SamplingOptions) -> Result<Value> {
        // Take first 20 words and join them
        let words: Vec<&str> = prompt.split_whitespace().take(20).collect();
        Ok(json!([{ "generated_text": words.join(" ") }]))
    }
}

/// 1x1 transparent PNG.
const BLANK_PNG: [u8; 67] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Offline image backend returning a blank PNG for every prompt.
#[derive(Debug, Default)]
pub struct DummyImageModel;

impl DummyImageModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ImageGenerator for DummyImageModel {
    fn name(&self) -> &str {
        "DummyImage"
    }

    async fn generate_image(&self, _prompt: &str, _options: &ImageOptions) -> Result<Vec<u8>> {
        Ok(BLANK_PNG.to_vec())
    }
}
