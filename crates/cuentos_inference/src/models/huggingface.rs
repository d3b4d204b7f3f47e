use std::fmt;

use async_trait::async_trait;
use cuentos_core::{Error, Result, SamplingOptions, TextGenerator};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::Config;

#[derive(Serialize)]
struct Parameters {
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Serialize)]
struct TextRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

/// `<api_base>/<model>`, validated.
pub(crate) fn model_endpoint(api_base: &str, model: &str) -> Result<Url> {
    let raw = format!("{}/{}", api_base.trim_end_matches('/'), model.trim_start_matches('/'));
    Url::parse(&raw).map_err(|e| Error::Config(format!("invalid model endpoint {}: {}", raw, e)))
}

pub(crate) fn require_token(config: &Config) -> Result<String> {
    config
        .api_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::Config("HUGGINGFACEHUB_API_TOKEN is not set".to_string()))
}

/// Turns a non-2xx response into an inference error carrying the body.
pub(crate) async fn check_status(model: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Inference(format!("{} returned {}: {}", model, status, body)))
}

/// Text generation through the Hugging Face inference api.
pub struct HuggingFaceModel {
    client: Client,
    api_token: String,
    model: String,
    endpoint: Url,
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_token", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl HuggingFaceModel {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            api_token: require_token(config)?,
            model: config.text_model.clone(),
            endpoint: model_endpoint(&config.api_base, &config.text_model)?,
        })
    }

    pub fn request_body(prompt: &str, options: &SamplingOptions) -> Value {
        let request = TextRequest {
            inputs: prompt,
            parameters: Parameters {
                temperature: options.temperature,
                top_p: options.top_p,
                max_new_tokens: options.max_new_tokens,
                do_sample: true,
                return_full_text: false,
            },
        };
        serde_json::to_value(request).unwrap_or(Value::Null)
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, options: &SamplingOptions) -> Result<Value> {
        debug!("POST {} (temperature {})", self.endpoint, options.temperature);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_token)
            .json(&Self::request_body(prompt, options))
            .send()
            .await?;
        let response = check_status(&self.model, response).await?;
        Ok(response.json::<Value>().await?)
    }
}
