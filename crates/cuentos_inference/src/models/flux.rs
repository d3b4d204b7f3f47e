use std::fmt;

use async_trait::async_trait;
use cuentos_core::{ImageGenerator, ImageOptions, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::huggingface::{check_status, model_endpoint, require_token};
use crate::Config;

/// Image synthesis through the Hugging Face inference api. The response body
/// is returned untouched.
pub struct FluxImageModel {
    client: Client,
    api_token: String,
    model: String,
    endpoint: Url,
}

impl fmt::Debug for FluxImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluxImageModel")
            .field("api_token", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl FluxImageModel {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            api_token: require_token(config)?,
            model: config.image_model.clone(),
            endpoint: model_endpoint(&config.api_base, &config.image_model)?,
        })
    }
}

#[async_trait]
impl ImageGenerator for FluxImageModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_image(&self, prompt: &str, options: &ImageOptions) -> Result<Vec<u8>> {
        debug!("POST {} ({}x{})", self.endpoint, options.width, options.height);
        let body = json!({
            "inputs": prompt,
            "parameters": { "width": options.width, "height": options.height },
        });
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(&self.model, response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uses_image_model() {
        let config = Config {
            api_token: Some("hf_test".to_string()),
            ..Config::default()
        };
        let model = FluxImageModel::new(&config).unwrap();
        assert_eq!(model.name(), "black-forest-labs/FLUX.1-schnell");
        assert!(model.endpoint.as_str().ends_with("/models/black-forest-labs/FLUX.1-schnell"));
        assert!(!format!("{:?}", model).contains("hf_test"));
    }
}
