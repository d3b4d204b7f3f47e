use std::sync::Arc;

use cuentos_core::{CharacterRoster, Chunker, Result, TextGenerator};
use serde::Serialize;
use tracing::{info, warn};

use crate::prompts;
use crate::stage::{inputs, PromptStage};
use crate::summarizer::MapReduceSummarizer;

/// How `summarize` treats long documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStrategy {
    /// One summary call over the whole text.
    Direct,
    /// Chunk, map, reduce.
    MapReduce,
    /// Direct when the text fits in one chunk, map-reduce otherwise.
    #[default]
    Auto,
}

/// A villain or hero roster: the raw generated list plus what parsed out of it.
#[derive(Debug, Clone, Serialize)]
pub struct RosterResult {
    pub raw: String,
    pub roster: CharacterRoster,
}

impl RosterResult {
    fn parse(stage: &str, raw: String) -> Self {
        let roster = CharacterRoster::parse(&raw);
        if !roster.is_complete() {
            warn!(
                "Stage '{}' returned {} parseable entries instead of five",
                stage,
                roster.entries.len()
            );
        }
        Self { raw, roster }
    }
}

/// summary → villains → heroes → story. Each call takes the previous
/// stages' outputs as plain inputs; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct StoryPipeline {
    model: Arc<dyn TextGenerator>,
    chunker: Chunker,
    strategy: SummaryStrategy,
    summary: PromptStage,
    villains: PromptStage,
    heroes: PromptStage,
    story: PromptStage,
    summarizer: MapReduceSummarizer,
}

impl StoryPipeline {
    pub fn new(model: Arc<dyn TextGenerator>, chunker: Chunker) -> Self {
        Self {
            model,
            chunker,
            strategy: SummaryStrategy::default(),
            summary: prompts::summary_stage(),
            villains: prompts::villains_stage(),
            heroes: prompts::heroes_stage(),
            story: prompts::story_stage(),
            summarizer: MapReduceSummarizer::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: SummaryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn model(&self) -> &Arc<dyn TextGenerator> {
        &self.model
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        let args = inputs([("text", text)]);
        self.summary.validate(&args)?;

        let chunks = match self.strategy {
            SummaryStrategy::Direct => Vec::new(),
            _ => self.chunker.split(text),
        };
        let map_reduce = match self.strategy {
            SummaryStrategy::Direct => false,
            SummaryStrategy::MapReduce => true,
            SummaryStrategy::Auto => chunks.len() > 1,
        };

        let resumen = if map_reduce {
            info!("📝 Summarizing {} chunks with map-reduce", chunks.len());
            self.summarizer.summarize(self.model.as_ref(), &chunks).await?
        } else {
            info!("📝 Summarizing {} chars", text.chars().count());
            self.summary.run(self.model.as_ref(), &args).await?.value
        };
        Ok(resumen)
    }

    pub async fn villains(&self, resumen: &str) -> Result<RosterResult> {
        let result = self
            .villains
            .run(self.model.as_ref(), &inputs([("resumen", resumen)]))
            .await?;
        info!("🦹 Villains generated");
        Ok(RosterResult::parse(self.villains.name(), result.value))
    }

    pub async fn heroes(&self, resumen: &str, villano: &str) -> Result<RosterResult> {
        let result = self
            .heroes
            .run(
                self.model.as_ref(),
                &inputs([("resumen", resumen), ("villano", villano)]),
            )
            .await?;
        info!("🦸 Heroes generated against {}", villano);
        Ok(RosterResult::parse(self.heroes.name(), result.value))
    }

    pub async fn story(&self, resumen: &str, villano: &str, heroe: &str) -> Result<String> {
        let result = self
            .story
            .run(
                self.model.as_ref(),
                &inputs([("resumen", resumen), ("villano", villano), ("heroe", heroe)]),
            )
            .await?;
        info!("📖 Story generated: {} vs {}", heroe, villano);
        Ok(result.value)
    }
}
