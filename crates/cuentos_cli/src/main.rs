use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use cuentos_core::logging::init_logging;
use cuentos_core::{file_stamp, BlobStore, CharacterRoster, Chunker, Error, StoryArtifact};
use cuentos_inference::illustration::Illustrator;
use cuentos_inference::{create_image_model, create_model, Config, StoryPipeline};
use cuentos_scrappers::{handle_command, ExtractorManager, ScraperArgs};
use cuentos_storage::{create_store, DocumentCache, StoryArchive};
use cuentos_web::AppState;
use tracing::info;

mod batch;
mod duration;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Children's stories from news articles", long_about = None)]
pub struct Cli {
    /// Text backend: huggingface or dummy
    #[arg(long, env = "CUENTOS_MODEL", default_value = "huggingface")]
    model: String,
    /// Store backend for documents and stories: filesystem or memory
    #[arg(long, default_value = "filesystem")]
    storage: String,
    /// Root of the `documents/` and `historias/` folders
    #[arg(long, env = "CUENTOS_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
    #[arg(long, env = "HUGGINGFACEHUB_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,
    #[arg(long, env = "CUENTOS_API_BASE", default_value = cuentos_inference::DEFAULT_API_BASE)]
    api_base: String,
    #[arg(long, env = "CUENTOS_TEXT_MODEL", default_value = cuentos_inference::DEFAULT_TEXT_MODEL)]
    text_model: String,
    #[arg(long, env = "CUENTOS_IMAGE_MODEL", default_value = cuentos_inference::DEFAULT_IMAGE_MODEL)]
    image_model: String,
    #[arg(long, default_value_t = cuentos_core::chunker::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
    #[arg(long, default_value_t = cuentos_core::chunker::DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,
    /// Annotate missing article elements with placeholder text
    #[arg(long)]
    verbose_missing: bool,
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP api
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: String,
    },
    /// Extract article text and cache it
    Extract(ScraperArgs),
    /// Map-reduce summary of every .txt file in a folder
    Summarize {
        #[arg(long, default_value = "documents")]
        input: PathBuf,
        #[arg(long, default_value = "stories")]
        output: PathBuf,
    },
    /// Run url → summary → villains → heroes → story
    Story {
        url: String,
        /// Villain name from the generated roster; the first entry by default
        #[arg(long)]
        villano: Option<String>,
        /// Hero name from the generated roster; the first entry by default
        #[arg(long)]
        heroe: Option<String>,
    },
    /// Generate a story for a theme and one image per scene
    Illustrate {
        theme: String,
        #[arg(long, default_value = ".")]
        output: PathBuf,
        /// Pause between image requests (e.g. 2s, 1m30s)
        #[arg(long, default_value = "2s")]
        delay: HumanDuration,
        /// Image backend: huggingface or dummy
        #[arg(long, default_value = "huggingface")]
        image_backend: String,
    },
    /// List archived stories
    List,
}

impl Cli {
    fn inference_config(&self) -> Config {
        Config {
            api_token: self.api_token.clone(),
            api_base: self.api_base.clone(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
        }
    }
}

/// Picks `wanted` from the roster, or its first entry. An unparseable roster
/// with no explicit pick is an error.
fn pick(stage: &str, roster: &CharacterRoster, wanted: Option<&str>) -> cuentos_core::Result<String> {
    match wanted {
        Some(name) => Ok(roster
            .find(name)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| name.trim().to_string())),
        None => roster
            .first()
            .map(|c| c.name.clone())
            .ok_or_else(|| Error::malformed(stage, "roster")),
    }
}

fn print_roster(title: &str, raw: &str) {
    println!("\n{}:\n{}", title, raw);
}

fn report_key(at: &DateTime<Utc>) -> String {
    format!("documents/resultadosscraping{}.txt", file_stamp(at))
}

async fn write_report(store: &dyn BlobStore, report: &str) -> cuentos_core::Result<String> {
    let key = report_key(&Utc::now());
    store.put(&key, report.as_bytes()).await?;
    Ok(key)
}

fn store_root(storage: &str, data_dir: &Path) -> String {
    if storage == "memory" {
        "memory".to_string()
    } else {
        data_dir.display().to_string()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let chunker = Chunker::new(cli.chunk_size, cli.chunk_overlap)?;
    let config = cli.inference_config();
    let store = create_store(&cli.storage, &cli.data_dir)?;
    info!("💾 Storage ready ({} at {})", cli.storage, store_root(&cli.storage, &cli.data_dir));
    let extractor = ExtractorManager::new(cli.verbose_missing);

    match cli.command {
        Commands::Serve { ref addr } => {
            let model = create_model(&cli.model, &config)?;
            info!("🧠 Inference model initialized (using {})", model.name());
            let state = AppState::new(StoryPipeline::new(model, chunker), extractor, store);
            cuentos_web::serve(addr, state).await?;
        }
        Commands::Extract(args) => {
            let output = handle_command(args, &extractor).await?;
            let documents = DocumentCache::new(store.clone());
            for article in &output.articles {
                let key = documents.store(article).await?;
                info!("Archivo guardado en: {}", key.store_key());
            }
            if let Some(report) = output.report {
                let key = write_report(store.as_ref(), &report).await?;
                println!("Resultados guardados en: {}", key);
            }
        }
        Commands::Summarize { ref input, ref output } => {
            let model = create_model(&cli.model, &config)?;
            let written = batch::summarize_dir(model.as_ref(), &chunker, input, output)
                .await
                .with_context(|| format!("summarizing {}", input.display()))?;
            println!("{} resúmenes escritos en {}", written.len(), output.display());
        }
        Commands::Story {
            ref url,
            ref villano,
            ref heroe,
        } => {
            let model = create_model(&cli.model, &config)?;
            let pipeline = StoryPipeline::new(model, chunker);

            let article = extractor.extract(url).await?;
            let key = DocumentCache::new(store.clone()).store(&article).await?;
            info!("Archivo generado en: {}", key.store_key());

            let resumen = pipeline.summarize(&article.extracted_text).await?;
            println!("Resumen:\n{}", resumen);

            let villanos = pipeline.villains(&resumen).await?;
            print_roster("Villanos", &villanos.raw);
            let villano = pick("villains", &villanos.roster, villano.as_deref())?;

            let heroes = pipeline.heroes(&resumen, &villano).await?;
            print_roster("Héroes", &heroes.raw);
            let heroe = pick("heroes", &heroes.roster, heroe.as_deref())?;

            let historia = pipeline.story(&resumen, &villano, &heroe).await?;
            let archivo = StoryArchive::new(store)
                .archive(&StoryArtifact::new(&resumen, &villano, &heroe, &historia))
                .await?;
            println!("\nHistoria ({} vs {}):\n{}", heroe, villano, historia);
            println!("\nHistoria guardada en: {}", archivo);
        }
        Commands::Illustrate {
            ref theme,
            ref output,
            delay,
            ref image_backend,
        } => {
            let text_model = create_model(&cli.model, &config)?;
            let image_model = create_image_model(image_backend, &config)?;
            let images = create_store("filesystem", output)?;
            let report = Illustrator::new(text_model, image_model, images)
                .with_delay(delay.0)
                .run(theme)
                .await?;

            println!("Historia completa:\n{}\n\nEscenas principales:", report.story);
            for scene in &report.scenes {
                println!(
                    "{}. {} [{}]",
                    scene.index,
                    scene.original_text,
                    scene.image.as_deref().unwrap_or("sin imagen")
                );
            }
            println!(
                "Proceso completado. Se han generado {} imágenes.",
                report.images_written()
            );
        }
        Commands::List => {
            let archive = StoryArchive::new(store);
            let keys = archive.list().await?;
            if keys.is_empty() {
                println!("No hay historias guardadas.");
            }
            for key in keys {
                let story = archive.load(&key).await?;
                println!("{}  {} vs {}", key, story.heroe, story.villano);
            }
        }
    }

    Ok(())
}
