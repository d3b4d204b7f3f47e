use std::sync::Arc;

use cuentos_core::{Error, ImageGenerator, Result, TextGenerator};

use crate::Config;

pub mod dummy;
pub mod flux;
pub mod huggingface;
pub mod scripted;

pub use dummy::{DummyImageModel, DummyModel};
pub use flux::FluxImageModel;
pub use huggingface::HuggingFaceModel;
pub use scripted::ScriptedModel;

/// Text backend by name: `huggingface` (alias `hf`) or `dummy`.
pub fn create_model(kind: &str, config: &Config) -> Result<Arc<dyn TextGenerator>> {
    match kind {
        "huggingface" | "hf" => Ok(Arc::new(HuggingFaceModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "unknown text model '{}', expected huggingface or dummy",
            other
        ))),
    }
}

/// Image backend by name: `huggingface` (FLUX through the inference api) or `dummy`.
pub fn create_image_model(kind: &str, config: &Config) -> Result<Arc<dyn ImageGenerator>> {
    match kind {
        "huggingface" | "hf" => Ok(Arc::new(FluxImageModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyImageModel::new())),
        other => Err(Error::Config(format!(
            "unknown image model '{}', expected huggingface or dummy",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model() {
        let config = Config::default();
        assert_eq!(create_model("dummy", &config).unwrap().name(), "Dummy");
        assert!(create_model("deepseek", &config).is_err());
        assert!(create_image_model("dummy", &config).is_ok());
    }

    #[test]
    fn test_huggingface_requires_token() {
        let config = Config {
            api_token: None,
            ..Config::default()
        };
        assert!(matches!(create_model("huggingface", &config), Err(Error::Config(_))));

        let config = Config {
            api_token: Some("hf_test".to_string()),
            ..Config::default()
        };
        assert_eq!(
            create_model("hf", &config).unwrap().name(),
            "meta-llama/Llama-3.2-3B-Instruct"
        );
    }
}
