//! HTTP router wiring.

use crate::ingestion::handlers::{handle_ingest_event, handle_upload_photo};
use crate::ingestion::service::{IngestionService, PhotoUploader};
use crate::search::engine::SearchService;
use crate::search::handlers::handle_search;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppServices {
    pub ingestion: Arc<IngestionService>,
    pub search: Arc<SearchService>,
    pub uploader: Arc<PhotoUploader>,
}

pub fn router(services: AppServices) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search))
        .route("/ingest", post(handle_ingest_event))
        .route("/photos/*key", put(handle_upload_photo))
        .layer(Extension(services.ingestion))
        .layer(Extension(services.search))
        .layer(Extension(services.uploader))
        .layer(cors)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests;
