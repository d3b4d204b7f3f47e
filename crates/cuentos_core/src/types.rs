use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of entries a villain or hero roster is expected to hold.
pub const ROSTER_SIZE: usize = 5;

/// Number of scenes the illustration pipeline renders.
pub const SCENE_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub source_url: String,
    /// Name of the extractor that produced `extracted_text`.
    pub source: String,
    #[serde(skip)]
    pub raw_markup: Vec<u8>,
    pub extracted_text: String,
    pub extracted_at: DateTime<Utc>,
}

impl Article {
    pub fn new(source_url: &str, source: &str, raw_markup: Vec<u8>, extracted_text: String) -> Self {
        Self {
            source_url: source_url.to_string(),
            source: source.to_string(),
            raw_markup,
            extracted_text,
            extracted_at: Utc::now(),
        }
    }
}

/// A chunk of a longer text. `offset` is the byte position of `content` in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub offset: usize,
}

impl Document {
    pub fn new(content: impl Into<String>, offset: usize) -> Self {
        Self {
            content: content.into(),
            offset,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.content.len()
    }
}

/// Output of one successful prompt stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: String,
    pub output_field: String,
    pub raw_response: serde_json::Value,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub number: u32,
    pub name: String,
    pub ability: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRoster {
    pub entries: Vec<Character>,
}

fn roster_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*[\).]\s*\*\*(.+?)\*\*\s*:?\s*(.*)$").expect("valid roster regex")
    })
}

impl CharacterRoster {
    /// Parses the enumerated `N) **Name**: (ability)` format. Lines that do not
    /// match are ignored; at most `ROSTER_SIZE` entries are kept.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| roster_line().captures(line))
            .filter_map(|caps| {
                let number = caps[1].parse::<u32>().ok()?;
                let name = caps[2].trim().trim_end_matches(':').trim().to_string();
                if name.is_empty() {
                    return None;
                }
                let ability = caps[3].trim();
                let ability = ability
                    .strip_prefix('(')
                    .and_then(|a| a.strip_suffix(')'))
                    .unwrap_or(ability)
                    .trim()
                    .to_string();
                Some(Character { number, name, ability })
            })
            .take(ROSTER_SIZE)
            .collect();
        Self { entries }
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == ROSTER_SIZE
    }

    pub fn find(&self, name: &str) -> Option<&Character> {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
    }

    pub fn first(&self) -> Option<&Character> {
        self.entries.first()
    }
}

/// Timestamp used in generated file names, always in UTC.
pub fn file_stamp(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryArtifact {
    pub resumen: String,
    pub villano: String,
    pub heroe: String,
    pub historia: String,
    pub created_at: DateTime<Utc>,
}

impl StoryArtifact {
    pub fn new(resumen: &str, villano: &str, heroe: &str, historia: &str) -> Self {
        Self {
            resumen: resumen.to_string(),
            villano: villano.to_string(),
            heroe: heroe.to_string(),
            historia: historia.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based position in the story.
    pub index: usize,
    pub original_text: String,
    pub enhanced_description: String,
    pub translated_description: String,
    /// Store key of the rendered image, when rendering succeeded.
    pub image: Option<String>,
}

impl Scene {
    pub fn new(index: usize, original_text: impl Into<String>) -> Self {
        let original_text = original_text.into();
        Self {
            index,
            enhanced_description: original_text.clone(),
            translated_description: original_text.clone(),
            original_text,
            image: None,
        }
    }
}
