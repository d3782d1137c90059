use super::engine::SearchService;
use super::types::{SearchParams, SearchResponse};
use crate::error::ErrorKind;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_search(
    Extension(service): Extension<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<SearchResponse>) {
    let query = params.q.unwrap_or_default();
    tracing::info!("Query: {:?}", query);

    match service.search(&query).await {
        Ok(results) => (StatusCode::OK, Json(SearchResponse::found(results))),
        Err(e) => match e.kind() {
            ErrorKind::Validation => (
                StatusCode::BAD_REQUEST,
                Json(SearchResponse::empty("Missing query parameter")),
            ),
            ErrorKind::DataQuality => {
                tracing::debug!("No keywords extracted: {}", e);
                (
                    StatusCode::OK,
                    Json(SearchResponse::empty("No valid keywords found in query")),
                )
            }
            ErrorKind::Collaborator => {
                tracing::error!("Error searching photos: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SearchResponse::empty(format!("Error searching photos: {}", e))),
                )
            }
        },
    }
}
