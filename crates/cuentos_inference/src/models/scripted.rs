use std::fmt;
use std::sync::Mutex;

use cuentos_core::{Result, SamplingOptions, TextGenerator};
use serde_json::{json, Value};

type Responder = Box<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// Text backend answering through a closure and recording every call.
/// Drives pipelines in tests and offline runs.
pub struct ScriptedModel {
    responder: Responder,
    calls: Mutex<Vec<(String, SamplingOptions)>>,
}

impl fmt::Debug for ScriptedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedModel")
            .field("calls", &self.call_count())
            .finish()
    }
}

impl ScriptedModel {
    /// Wraps each answer as `[{"generated_text": ...}]`.
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self::from_value(move |prompt| respond(prompt).map(|text| json!([{ "generated_text": text }])))
    }

    /// Answers with the raw response body.
    pub fn from_value<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, SamplingOptions)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|(prompt, _)| prompt).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Number of recorded prompts containing `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.prompts().iter().filter(|p| p.contains(needle)).count()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedModel {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn generate(&self, prompt: &str, options: &SamplingOptions) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), *options));
        }
        (self.responder)(prompt)
    }
}
