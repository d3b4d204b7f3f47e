use cuentos_core::{Document, Error, Result, TextGenerator};
use futures::future::join_all;
use tracing::info;

use crate::prompts;
use crate::stage::{inputs, PromptStage};

/// Summarizes every chunk independently, then summarizes the concatenated
/// partial summaries for a young audience.
#[derive(Debug, Clone)]
pub struct MapReduceSummarizer {
    map: PromptStage,
    reduce: PromptStage,
}

impl MapReduceSummarizer {
    pub fn new() -> Self {
        Self::with_stages(prompts::map_stage(), prompts::combine_stage())
    }

    pub fn with_stages(map: PromptStage, reduce: PromptStage) -> Self {
        Self { map, reduce }
    }

    /// Map phase. Chunks run concurrently; outputs keep chunk order.
    pub async fn map(&self, model: &dyn TextGenerator, chunks: &[Document]) -> Result<Vec<String>> {
        let runs = chunks.iter().map(|chunk| {
            let args = inputs([("text", chunk.content.as_str())]);
            async move { self.map.run(model, &args).await }
        });
        join_all(runs)
            .await
            .into_iter()
            .map(|result| result.map(|r| r.value))
            .collect()
    }

    pub async fn summarize(&self, model: &dyn TextGenerator, chunks: &[Document]) -> Result<String> {
        if chunks.is_empty() {
            return Err(Error::missing_field(self.map.name(), "text"));
        }
        let partials = self.map(model, chunks).await?;
        info!("🧩 Mapped {} chunks, reducing", partials.len());

        let combined = partials.join("\n\n");
        let result = self
            .reduce
            .run(model, &inputs([("text", combined.as_str())]))
            .await?;
        Ok(result.value)
    }
}

impl Default for MapReduceSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScriptedModel;

    #[tokio::test]
    async fn test_map_preserves_chunk_order() {
        let model = ScriptedModel::new(|prompt| {
            let marker = ["uno", "dos", "tres"]
                .into_iter()
                .find(|m| prompt.contains(&format!("fragmento {}", m)))
                .unwrap_or("reduce");
            Ok(format!("parcial {}", marker))
        });
        let chunks = vec![
            Document::new("fragmento uno", 0),
            Document::new("fragmento dos", 14),
            Document::new("fragmento tres", 28),
        ];
        let partials = MapReduceSummarizer::new().map(&model, &chunks).await.unwrap();
        assert_eq!(partials, ["parcial uno", "parcial dos", "parcial tres"]);
    }

    #[tokio::test]
    async fn test_no_chunks_is_missing_text() {
        let model = ScriptedModel::new(|_| Ok(String::new()));
        let err = MapReduceSummarizer::new().summarize(&model, &[]).await.unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_map_failure_skips_reduce() {
        let model = ScriptedModel::new(|prompt| {
            if prompt.contains("roto") {
                Err(Error::Inference("boom".to_string()))
            } else {
                Ok("bien".to_string())
            }
        });
        let chunks = vec![Document::new("sano", 0), Document::new("roto", 5)];
        assert!(MapReduceSummarizer::new().summarize(&model, &chunks).await.is_err());
        assert_eq!(model.count_matching("Resumen educativo para niños"), 0);
    }
}
