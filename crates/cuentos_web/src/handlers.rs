use std::sync::Arc;

use axum::{extract::State, Json};
use cuentos_core::{Character, Error, StoryArtifact};
use cuentos_storage::DocumentKey;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub archivo_txt: String,
    pub documento: String,
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResumenRequest {
    /// Session key returned by `/scrape`; the shared current slot when absent.
    pub documento: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StageRequest {
    pub resumen: Option<String>,
    pub villano: Option<String>,
    pub heroe: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VillanosResponse {
    pub villanos: String,
    pub personajes: Vec<Character>,
}

#[derive(Debug, Serialize)]
pub struct HeroesResponse {
    pub heroes: String,
    pub personajes: Vec<Character>,
}

#[derive(Debug, Serialize)]
pub struct HistoriaResponse {
    pub historia: String,
    pub archivo: String,
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScrapeRequest>,
) -> ApiResult<ScrapeResponse> {
    let url = request
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| Error::missing_field("scrape", "url"))?;
    info!("Scraping la URL: {}", url);

    let article = state.extractor.extract(&url).await?;
    let key = state.documents.store(&article).await?;
    info!("Archivo generado en: {}", key.store_key());

    Ok(Json(ScrapeResponse {
        archivo_txt: key.store_key(),
        documento: key.to_string(),
        text: article.extracted_text,
    }))
}

pub async fn resumen(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResumenRequest>,
) -> ApiResult<Value> {
    let key = match request.documento.as_deref().map(str::trim) {
        Some(documento) if !documento.is_empty() => DocumentKey::parse(documento)?,
        _ => DocumentKey::current(),
    };
    info!("Archivo solicitado para resumen: {}", key.store_key());

    let text = state.documents.load(&key).await?;
    let resumen = state.pipeline.summarize(&text).await?;
    Ok(Json(json!({ "resumen": resumen })))
}

pub async fn villanos(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StageRequest>,
) -> ApiResult<VillanosResponse> {
    let result = state.pipeline.villains(field(&request.resumen)).await?;
    Ok(Json(VillanosResponse {
        villanos: result.raw,
        personajes: result.roster.entries,
    }))
}

pub async fn heroes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StageRequest>,
) -> ApiResult<HeroesResponse> {
    let result = state
        .pipeline
        .heroes(field(&request.resumen), field(&request.villano))
        .await?;
    Ok(Json(HeroesResponse {
        heroes: result.raw,
        personajes: result.roster.entries,
    }))
}

pub async fn historia(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StageRequest>,
) -> ApiResult<HistoriaResponse> {
    let (resumen, villano, heroe) = (
        field(&request.resumen),
        field(&request.villano),
        field(&request.heroe),
    );
    let historia = state.pipeline.story(resumen, villano, heroe).await?;
    let archivo = state
        .archive
        .archive(&StoryArtifact::new(resumen, villano, heroe, &historia))
        .await?;
    Ok(Json(HistoriaResponse { historia, archivo }))
}
