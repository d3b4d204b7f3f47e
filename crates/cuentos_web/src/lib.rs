use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/scrape", post(handlers::scrape))
        .route("/resumen", post(handlers::resumen))
        .route("/villanos", post(handlers::villanos))
        .route("/heroes", post(handlers::heroes))
        .route("/historia", post(handlers::historia))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves the router until the process stops.
pub async fn serve(addr: &str, state: AppState) -> cuentos_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use cuentos_core::{Error, Result};
    pub use crate::{create_app, serve, AppState};
}
