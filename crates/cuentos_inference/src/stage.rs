use std::collections::BTreeMap;
use std::sync::OnceLock;

use cuentos_core::{Error, Result, SamplingOptions, StageResult, TextGenerator};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

/// Response field every text backend is expected to carry.
pub const OUTPUT_FIELD: &str = "generated_text";

/// Named string inputs of one stage invocation.
pub type StageInputs = BTreeMap<String, String>;

/// Builds `StageInputs` from `(name, value)` pairs.
pub fn inputs<'a, I>(pairs: I) -> StageInputs
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut variables: Vec<String> = Vec::new();
        for caps in placeholder().captures_iter(&source) {
            let name = &caps[1];
            if !variables.iter().any(|v| v == name) {
                variables.push(name.to_string());
            }
        }
        Self { source, variables }
    }

    /// Placeholder names in order of first appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn render(&self, inputs: &StageInputs) -> Result<String> {
        if let Some(unbound) = self.variables.iter().find(|v| !inputs.contains_key(*v)) {
            return Err(Error::Template(format!("unbound placeholder '{{{}}}'", unbound)));
        }
        let rendered = placeholder().replace_all(&self.source, |caps: &regex::Captures<'_>| {
            inputs.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

/// Reads the generated text out of a backend response: either an object
/// carrying `generated_text` or an array whose first element does.
pub fn extract_generated_text(stage: &str, response: &Value) -> Result<String> {
    let object = match response {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    object
        .and_then(|o| o.get(OUTPUT_FIELD))
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Error::malformed(stage, OUTPUT_FIELD))
}

/// One templated generation step.
#[derive(Debug, Clone)]
pub struct PromptStage {
    name: String,
    template: PromptTemplate,
    required_inputs: Vec<String>,
    sampling: SamplingOptions,
}

impl PromptStage {
    /// Every template placeholder becomes a required input.
    pub fn new(name: &str, template: &str, sampling: SamplingOptions) -> Self {
        let template = PromptTemplate::new(template);
        let required_inputs = template.variables().to_vec();
        Self {
            name: name.to_string(),
            template,
            required_inputs,
            sampling,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_inputs(&self) -> &[String] {
        &self.required_inputs
    }

    pub fn sampling(&self) -> &SamplingOptions {
        &self.sampling
    }

    /// Fails with `MissingField` on the first required input that is absent or blank.
    pub fn validate(&self, inputs: &StageInputs) -> Result<()> {
        for field in &self.required_inputs {
            let present = inputs.get(field).is_some_and(|v| !v.trim().is_empty());
            if !present {
                error!("Stage '{}' rejected: missing input '{}'", self.name, field);
                return Err(Error::missing_field(&self.name, field));
            }
        }
        Ok(())
    }

    pub fn render(&self, inputs: &StageInputs) -> Result<String> {
        self.template.render(inputs)
    }

    pub async fn run(&self, model: &dyn TextGenerator, inputs: &StageInputs) -> Result<StageResult> {
        self.validate(inputs)?;
        let prompt = self.render(inputs)?;
        debug!(
            "Running stage '{}' on {} ({} prompt chars)",
            self.name,
            model.name(),
            prompt.chars().count()
        );

        let response = model.generate(&prompt, &self.sampling).await.map_err(|e| {
            error!("Stage '{}' generation failed on {}: {}", self.name, model.name(), e);
            e
        })?;
        let value = extract_generated_text(&self.name, &response).map_err(|e| {
            error!("Stage '{}' got a malformed response: {}", self.name, response);
            e
        })?;

        Ok(StageResult {
            stage: self.name.clone(),
            output_field: OUTPUT_FIELD.to_string(),
            raw_response: response,
            value,
        })
    }
}
