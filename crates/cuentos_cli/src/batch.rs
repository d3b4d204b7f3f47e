use std::path::{Path, PathBuf};

use cuentos_core::{Chunker, Result, TextGenerator};
use cuentos_inference::summarizer::MapReduceSummarizer;
use cuentos_storage::DocumentCache;
use tokio::fs;
use tracing::{info, warn};

/// Map-reduce summary of every `.txt` file in `input`, written to
/// `output/resumen_<name>.txt`. Returns the written paths in file-name order.
pub async fn summarize_dir(
    model: &dyn TextGenerator,
    chunker: &Chunker,
    input: &Path,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output).await?;

    let mut sources = Vec::new();
    let mut entries = fs::read_dir(input).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") => sources.push(path),
            Some("pdf") => warn!("Skipping {}: PDF input is not supported", path.display()),
            _ => {}
        }
    }
    sources.sort();

    let summarizer = MapReduceSummarizer::new();
    let mut written = Vec::with_capacity(sources.len());
    for path in sources {
        let raw = fs::read_to_string(&path).await?;
        // cached documents carry a header line; plain files pass through
        let text = DocumentCache::body(&raw);
        if text.is_empty() {
            warn!("Skipping empty file {}", path.display());
            continue;
        }

        let chunks = chunker.split(text);
        let summary = summarizer.summarize(model, &chunks).await?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("documento");
        let target = output.join(format!("resumen_{}.txt", stem));
        fs::write(&target, summary).await?;
        info!("Cuento guardado: {}", target.display());
        written.push(target);
    }

    if written.is_empty() {
        info!("No se encontraron archivos TXT para procesar.");
    }
    Ok(written)
}
