use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Error processing {url}: {details}")]
    Fetch { url: String, details: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field '{field}' for stage '{stage}'")]
    MissingField { stage: String, field: String },

    #[error("Generation response malformed: stage '{stage}' expected field '{field}'")]
    MalformedResponse { stage: String, field: String },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn missing_field(stage: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            stage: stage.into(),
            field: field.into(),
        }
    }

    pub fn malformed(stage: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage: stage.into(),
            field: field.into(),
        }
    }

    /// The legacy fail-open rendering of a fetch failure, usable as article text.
    pub fn placeholder_text(&self) -> Option<String> {
        match self {
            Self::Fetch { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
