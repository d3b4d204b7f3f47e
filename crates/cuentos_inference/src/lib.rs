use std::fmt;

pub mod illustration;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod stage;
pub mod summarizer;

pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_TEXT_MODEL: &str = "meta-llama/Llama-3.2-3B-Instruct";
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

/// Resolved backend settings, filled from the command line and environment.
#[derive(Clone)]
pub struct Config {
    pub api_token: Option<String>,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

pub mod prelude {
    pub use super::illustration::{IllustrationReport, Illustrator};
    pub use super::models::{create_image_model, create_model};
    pub use super::pipeline::{RosterResult, StoryPipeline, SummaryStrategy};
    pub use super::summarizer::MapReduceSummarizer;
    pub use super::Config;
    pub use cuentos_core::{Error, Result};
}

pub use models::{create_image_model, create_model};
pub use pipeline::{RosterResult, StoryPipeline, SummaryStrategy};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_token() {
        let config = Config {
            api_token: Some("hf_secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains(DEFAULT_TEXT_MODEL));
    }
}
