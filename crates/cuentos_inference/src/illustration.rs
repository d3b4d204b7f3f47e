//! Batch illustration: theme → story and five scenes → enhanced, translated
//! descriptions → one image per scene.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cuentos_core::logging::Logger;
use cuentos_core::text::paragraphs;
use cuentos_core::{
    BlobStore, ImageGenerator, ImageOptions, Result, Scene, TextGenerator, SCENE_COUNT,
};
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::prompts;
use crate::stage::{inputs, PromptStage};

pub const STORY_MARKER: &str = "Historia completa:";
pub const SCENES_MARKER: &str = "Escenas:";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

fn list_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:\d+\s*[\.\):-]|[-*•])\s*").expect("valid list marker regex"))
}

/// Removes a leading `1.`, `2)` or bullet from a scene line.
pub fn strip_list_marker(line: &str) -> &str {
    match list_marker().find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

/// Built-in story used when generation fails or comes back without scenes.
pub fn default_story(theme: &str) -> (String, Vec<String>) {
    let story = [
        format!("En un mundo inspirado en {}, un héroe inesperado surge de entre la multitud.", theme),
        "Este protagonista descubre un poder oculto que cambia su destino y lo lanza a una aventura extraordinaria.".to_string(),
        "A lo largo de su viaje, enfrenta desafíos épicos que ponen a prueba sus nuevas habilidades y su determinación.".to_string(),
        "Con cada obstáculo superado, nuestro héroe crece y se transforma, inspirando a otros a su alrededor.".to_string(),
        "Aliados inesperados se unen a su causa, cada uno aportando habilidades únicas que complementan las del protagonista.".to_string(),
        "Juntos, forman un equipo imparable, superando obstáculos que parecían insuperables.".to_string(),
        "A medida que avanzan, descubren secretos antiguos que cambian su comprensión del mundo que los rodea.".to_string(),
        "Estos descubrimientos los llevan a cuestionar todo lo que creían saber, enfrentándolos a dilemas morales complejos.".to_string(),
        "En un giro inesperado, se encuentran cara a cara con el verdadero antagonista, cuyas motivaciones resultan ser más complejas de lo que imaginaban.".to_string(),
        format!("Finalmente, la aventura culmina en un emocionante clímax que no solo transforma a nuestro protagonista y sus aliados, sino que cambia para siempre el mundo de {}.", theme),
    ]
    .join("\n\n");

    let scenes = vec![
        format!("Un héroe inesperado descubre su destino en el mundo de {}.", theme),
        "El protagonista se embarca en una aventura, enfrentando su primer desafío.".to_string(),
        "Nuevos aliados se unen a la causa, formando un equipo diverso.".to_string(),
        "Un antiguo secreto es revelado, cambiando la perspectiva de nuestros héroes.".to_string(),
        format!("La victoria trae consigo cambios profundos, transformando el mundo de {} para siempre.", theme),
    ];
    (story, scenes)
}

/// Groups story paragraphs into `SCENE_COUNT` contiguous scenes whose sizes
/// differ by at most one; earlier scenes take the extra paragraphs. Stories
/// with fewer paragraphs than scenes give one scene per paragraph.
pub fn paragraphs_to_scenes(story: &str) -> Vec<String> {
    let paragraphs = paragraphs(story);
    if paragraphs.len() <= SCENE_COUNT {
        return paragraphs;
    }
    let base = paragraphs.len() / SCENE_COUNT;
    let extra = paragraphs.len() % SCENE_COUNT;

    let mut scenes = Vec::with_capacity(SCENE_COUNT);
    let mut start = 0;
    for i in 0..SCENE_COUNT {
        let size = base + usize::from(i < extra);
        scenes.push(paragraphs[start..start + size].join(" "));
        start += size;
    }
    scenes
}

/// Splits a `Historia completa: ... Escenas: 1. ...` response. Returns `None`
/// when the scenes marker is missing.
pub fn parse_story_and_scenes(response: &str) -> Option<(String, Vec<String>)> {
    let (story, scenes) = response.split_once(SCENES_MARKER)?;
    let story = story.replace(STORY_MARKER, "").trim().to_string();
    let scenes = scenes
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .take(SCENE_COUNT)
        .map(str::to_string)
        .collect();
    Some((story, scenes))
}

/// Generates a story with five scenes. Never fails: a generation error or a
/// response without scenes yields `default_story`, and a response with fewer
/// than five scene lines takes its scenes from the story paragraphs.
pub async fn generate_story_and_scenes(model: &dyn TextGenerator, theme: &str) -> (String, Vec<String>) {
    let stage = prompts::illustrated_story_stage();
    let response = match stage.run(model, &inputs([("theme", theme)])).await {
        Ok(result) => result.value,
        Err(e) => {
            warn!("Error al generar la historia: {}", e);
            return default_story(theme);
        }
    };

    let Some((story, scenes)) = parse_story_and_scenes(&response) else {
        warn!("La respuesta no contiene escenas. Generando historia predeterminada.");
        return default_story(theme);
    };
    if scenes.len() == SCENE_COUNT {
        return (story, scenes);
    }

    let from_paragraphs = paragraphs_to_scenes(&story);
    if from_paragraphs.len() == SCENE_COUNT {
        info!("Only {} scene lines, deriving scenes from paragraphs", scenes.len());
        (story, from_paragraphs)
    } else {
        warn!("Story too short for {} scenes. Using the default story.", SCENE_COUNT);
        default_story(theme)
    }
}

/// Character and setting list of a story; "" when generation fails.
pub async fn extract_characters_and_settings(model: &dyn TextGenerator, story: &str) -> String {
    match prompts::characters_stage().run(model, &inputs([("story", story)])).await {
        Ok(result) => result.value,
        Err(e) => {
            warn!("Error al extraer personajes y escenarios: {}", e);
            String::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneEnhancer {
    stage: PromptStage,
}

impl SceneEnhancer {
    pub fn new() -> Self {
        Self {
            stage: prompts::enhance_stage(),
        }
    }

    /// Visual rewrite of `scene`; the scene itself on failure.
    pub async fn enhance(
        &self,
        model: &dyn TextGenerator,
        scene: &str,
        theme: &str,
        characters: &str,
        settings: &str,
    ) -> String {
        // the character list may legitimately be empty
        let characters = if characters.trim().is_empty() { "-" } else { characters };
        let settings = if settings.trim().is_empty() { "-" } else { settings };
        let args = inputs([
            ("scene", scene),
            ("theme", theme),
            ("characters", characters),
            ("settings", settings),
        ]);
        match self.stage.run(model, &args).await {
            Ok(result) if !result.value.is_empty() => result.value,
            Ok(_) => {
                warn!("Empty enhanced description, keeping original scene");
                scene.to_string()
            }
            Err(e) => {
                warn!("Error al mejorar la descripción: {}", e);
                scene.to_string()
            }
        }
    }
}

impl Default for SceneEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    stage: PromptStage,
    language: String,
}

impl Translator {
    /// `language` is named in Spanish inside the prompt, e.g. "inglés".
    pub fn new(language: &str) -> Self {
        Self {
            stage: prompts::translate_stage(),
            language: language.to_string(),
        }
    }

    pub fn english() -> Self {
        Self::new("inglés")
    }

    /// Translated text; the input itself on failure.
    pub async fn translate(&self, model: &dyn TextGenerator, text: &str) -> String {
        let args = inputs([("text", text), ("language", self.language.as_str())]);
        match self.stage.run(model, &args).await {
            Ok(result) if !result.value.is_empty() => result.value,
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!("Error en la traducción: {}", e);
                text.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IllustrationReport {
    pub theme: String,
    pub story: String,
    pub characters_and_settings: String,
    pub scenes: Vec<Scene>,
}

impl IllustrationReport {
    pub fn images_written(&self) -> usize {
        self.scenes.iter().filter(|s| s.image.is_some()).count()
    }
}

/// Runs the whole illustration batch, one scene at a time, writing
/// `escena_<i>.png` into the store.
pub struct Illustrator {
    text_model: Arc<dyn TextGenerator>,
    image_model: Arc<dyn ImageGenerator>,
    store: Arc<dyn BlobStore>,
    enhancer: SceneEnhancer,
    translator: Translator,
    image_options: ImageOptions,
    style: String,
    delay: Duration,
}

impl Illustrator {
    pub fn new(
        text_model: Arc<dyn TextGenerator>,
        image_model: Arc<dyn ImageGenerator>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            text_model,
            image_model,
            store,
            enhancer: SceneEnhancer::new(),
            translator: Translator::english(),
            image_options: ImageOptions::default(),
            style: prompts::STYLE.to_string(),
            delay: DEFAULT_DELAY,
        }
    }

    /// Pause between consecutive image requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_image_options(mut self, options: ImageOptions) -> Self {
        self.image_options = options;
        self
    }

    pub fn image_key(index: usize) -> String {
        format!("escena_{}.png", index)
    }

    pub async fn run(&self, theme: &str) -> Result<IllustrationReport> {
        let text_model = self.text_model.as_ref();
        let (story, scene_texts) = generate_story_and_scenes(text_model, theme).await;
        info!("📖 Historia completa:\n{}", story);

        let context = extract_characters_and_settings(text_model, &story).await;
        info!("Personajes y escenarios extraídos:\n{}", context);

        let total = scene_texts.len();
        let mut scenes = Vec::with_capacity(total);
        for (i, text) in scene_texts.into_iter().enumerate() {
            let index = i + 1;
            let logger = Logger::new()
                .with_prefix("🎬".to_string())
                .with_prefix(format!("escena {}/{}", index, total));
            let mut scene = Scene::new(index, text);
            logger.info(&format!("Original: {}", scene.original_text));

            scene.enhanced_description = self
                .enhancer
                .enhance(text_model, &scene.original_text, theme, &context, &context)
                .await;
            logger.info(&format!("Descripción mejorada: {}", scene.enhanced_description));
            scene.translated_description = self
                .translator
                .translate(text_model, &scene.enhanced_description)
                .await;

            scene.image = self.render(&logger, &scene).await;

            scenes.push(scene);
            if index < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let report = IllustrationReport {
            theme: theme.to_string(),
            story,
            characters_and_settings: context,
            scenes,
        };
        info!(
            "Proceso completado. Se han generado {} imágenes.",
            report.images_written()
        );
        Ok(report)
    }

    /// Store key of the written image, or `None` when synthesis or the write failed.
    async fn render(&self, logger: &Logger, scene: &Scene) -> Option<String> {
        let prompt = format!("{} {}", scene.translated_description, self.style);
        let bytes = match self.image_model.generate_image(&prompt, &self.image_options).await {
            Ok(bytes) => bytes,
            Err(e) => {
                logger.error(&format!("Error al generar la imagen: {}", e));
                return None;
            }
        };
        let key = Self::image_key(scene.index);
        match self.store.put(&key, &bytes).await {
            Ok(()) => {
                logger.info(&format!("Imagen guardada como {}", key));
                Some(key)
            }
            Err(e) => {
                logger.error(&format!("Error al guardar {}: {}", key, e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DummyImageModel, ScriptedModel};
    use async_trait::async_trait;
    use cuentos_core::Error;
    use cuentos_storage::MemoryStore;

    /// Fails for prompts mentioning `needle`.
    #[derive(Debug)]
    struct FlakyImageModel {
        needle: &'static str,
    }

    #[async_trait]
    impl ImageGenerator for FlakyImageModel {
        fn name(&self) -> &str {
            "Flaky"
        }

        async fn generate_image(&self, prompt: &str, _options: &ImageOptions) -> Result<Vec<u8>> {
            if prompt.contains(self.needle) {
                Err(Error::Inference("rate limited".to_string()))
            } else {
                Ok(vec![1, 2, 3])
            }
        }
    }

    const RESPONSE: &str = "Historia completa:\nMarea vivía junto al mar.\n\nUn día vio basura.\n\n\
        Escenas:\n1. Marea despierta en la playa.\n2) Marea encuentra bolsas.\n\
        3. Marea llama a sus amigos.\n4. Todos limpian juntos.\n5. El mar brilla de nuevo.\n6. Extra.";

    #[test]
    fn test_parse_story_and_scenes() {
        let (story, scenes) = parse_story_and_scenes(RESPONSE).unwrap();
        assert_eq!(story, "Marea vivía junto al mar.\n\nUn día vio basura.");
        assert_eq!(scenes.len(), SCENE_COUNT);
        assert_eq!(scenes[0], "Marea despierta en la playa.");
        assert_eq!(scenes[1], "Marea encuentra bolsas.");
        assert_eq!(scenes[4], "El mar brilla de nuevo.");
        assert!(parse_story_and_scenes("Solo una historia.").is_none());
    }

    #[test]
    fn test_paragraphs_to_scenes_groups_evenly() {
        let story = (1..=12).map(|i| format!("P{}.", i)).collect::<Vec<_>>().join("\n\n");
        let scenes = paragraphs_to_scenes(&story);
        assert_eq!(scenes, ["P1. P2. P3.", "P4. P5. P6.", "P7. P8.", "P9. P10.", "P11. P12."]);

        let story = (1..=10).map(|i| format!("P{}.", i)).collect::<Vec<_>>().join("\n\n");
        assert!(paragraphs_to_scenes(&story)
            .iter()
            .all(|s| s.split(". ").count() == 2));

        assert_eq!(paragraphs_to_scenes("Uno.\n\nDos."), ["Uno.", "Dos."]);
    }

    #[test]
    fn test_default_story_shape() {
        let (story, scenes) = default_story("el océano");
        assert_eq!(scenes.len(), SCENE_COUNT);
        assert_eq!(paragraphs(&story).len(), 10);
        assert!(story.contains("el océano"));
        assert!(scenes[0].contains("el océano"));
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back_to_default_story() {
        let model = ScriptedModel::new(|_| Err(Error::Inference("down".to_string())));
        let (story, scenes) = generate_story_and_scenes(&model, "los bosques").await;
        assert_eq!((story, scenes), default_story("los bosques"));

        let model = ScriptedModel::new(|_| Ok("Sin marcador de escenas".to_string()));
        let (_, scenes) = generate_story_and_scenes(&model, "los bosques").await;
        assert_eq!(scenes, default_story("los bosques").1);
    }

    #[tokio::test]
    async fn test_few_scene_lines_derive_scenes_from_paragraphs() {
        let story = (1..=10).map(|i| format!("Párrafo {}.", i)).collect::<Vec<_>>().join("\n\n");
        let response = format!("Historia completa:\n{}\n\nEscenas:\n1. Solo una.", story);
        let model = ScriptedModel::new(move |_| Ok(response.clone()));
        let (_, scenes) = generate_story_and_scenes(&model, "el río").await;
        assert_eq!(scenes.len(), SCENE_COUNT);
        assert_eq!(scenes[0], "Párrafo 1. Párrafo 2.");
    }

    #[tokio::test]
    async fn test_enhancer_and_translator_fail_open() {
        let model = ScriptedModel::new(|_| Err(Error::Inference("down".to_string())));
        let enhanced = SceneEnhancer::new()
            .enhance(&model, "Marea en la playa.", "el mar", "", "")
            .await;
        assert_eq!(enhanced, "Marea en la playa.");
        let translated = Translator::english().translate(&model, "Hola").await;
        assert_eq!(translated, "Hola");
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_translator_prompt_names_language() {
        let model = ScriptedModel::new(|_| Ok("Hello".to_string()));
        let translated = Translator::english().translate(&model, "Hola").await;
        assert_eq!(translated, "Hello");
        assert!(model.prompts()[0].starts_with("Traduce el siguiente texto al inglés"));
    }

    fn scripted_illustration_model() -> Arc<ScriptedModel> {
        Arc::new(ScriptedModel::new(|prompt| {
            if prompt.starts_with("Genera una historia corta") {
                Ok(RESPONSE.to_string())
            } else if prompt.starts_with("Basándote en la siguiente historia") {
                Ok("Personajes:\n- Marea".to_string())
            } else if prompt.starts_with("Mejora esta escena") {
                Err(Error::Inference("enhancer down".to_string()))
            } else {
                // translation: echo the text after the instruction
                Ok(prompt.rsplit("\n\n").next().unwrap_or_default().to_string())
            }
        }))
    }

    #[tokio::test]
    async fn test_illustrator_writes_one_image_per_scene() {
        let store = Arc::new(MemoryStore::new());
        let illustrator = Illustrator::new(
            scripted_illustration_model(),
            Arc::new(DummyImageModel::new()),
            store.clone(),
        )
        .with_delay(Duration::ZERO);

        let report = illustrator.run("el mar").await.unwrap();
        assert_eq!(report.scenes.len(), SCENE_COUNT);
        assert_eq!(report.images_written(), SCENE_COUNT);
        assert_eq!(report.characters_and_settings, "Personajes:\n- Marea");
        for (i, scene) in report.scenes.iter().enumerate() {
            assert_eq!(scene.index, i + 1);
            // enhancer failed open
            assert_eq!(scene.enhanced_description, scene.original_text);
        }
        let keys = store.list("escena_").await.unwrap();
        assert_eq!(keys.len(), SCENE_COUNT);
        assert!(keys.contains(&"escena_5.png".to_string()));
    }

    #[tokio::test]
    async fn test_image_failure_does_not_abort_batch() {
        let store = Arc::new(MemoryStore::new());
        let illustrator = Illustrator::new(
            scripted_illustration_model(),
            Arc::new(FlakyImageModel { needle: "bolsas" }),
            store.clone(),
        )
        .with_delay(Duration::ZERO);

        let report = illustrator.run("el mar").await.unwrap();
        assert_eq!(report.scenes.len(), SCENE_COUNT);
        assert_eq!(report.images_written(), SCENE_COUNT - 1);
        assert!(report.scenes[1].image.is_none());
        assert!(store.get("escena_2.png").await.unwrap().is_none());
        assert_eq!(store.get("escena_3.png").await.unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_scenes() {
        let illustrator = Illustrator::new(
            scripted_illustration_model(),
            Arc::new(DummyImageModel::new()),
            Arc::new(MemoryStore::new()),
        );
        let started = tokio::time::Instant::now();
        illustrator.run("el mar").await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_DELAY * (SCENE_COUNT as u32 - 1));
        assert!(elapsed < DEFAULT_DELAY * SCENE_COUNT as u32);
    }
}
