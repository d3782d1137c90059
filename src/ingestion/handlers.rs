use super::service::{IngestionService, PhotoUploader};
use super::types::{RecordBody, RecordResponse, S3Event, UploadNotification, UploadResponse};
use crate::error::{ErrorKind, PhotoError};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::json;
use std::sync::Arc;

/// Header the upload client sends custom labels in.
pub const CUSTOM_LABELS_HEADER: &str = "x-amz-meta-customlabels";

fn failure_status(e: &PhotoError) -> StatusCode {
    match e.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Collaborator | ErrorKind::DataQuality => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Accepts a storage notification batch and answers with one response per
/// record. The batch status is 200 when every record was indexed and 207
/// otherwise. A body that is not an event at all gets a single 400.
pub async fn handle_ingest_event(
    Extension(service): Extension<Arc<IngestionService>>,
    payload: Result<Json<S3Event>, JsonRejection>,
) -> Response {
    let event = match payload {
        Ok(Json(event)) => event,
        Err(rejection) => {
            tracing::warn!("Rejected ingestion payload: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Invalid ingestion event",
                    "error": rejection.body_text(),
                })),
            )
                .into_response();
        }
    };

    let uploads: Vec<Result<UploadNotification, PhotoError>> = event
        .records
        .into_iter()
        .map(|record| UploadNotification::try_from(record).map_err(PhotoError::from))
        .collect();

    tracing::info!("Received {} upload notifications", uploads.len());

    let responses: Vec<RecordResponse> = service
        .ingest_batch(uploads)
        .await
        .into_iter()
        .map(|result| match result {
            Ok(photo) => RecordResponse {
                status_code: StatusCode::OK.as_u16(),
                body: RecordBody::Indexed {
                    message: "Image processed successfully".to_string(),
                    id: photo.id,
                    labels: photo.document.labels,
                },
            },
            Err(e) => RecordResponse {
                status_code: failure_status(&e).as_u16(),
                body: RecordBody::Failed {
                    message: "Error processing image".to_string(),
                    error: e.to_string(),
                },
            },
        })
        .collect();

    let all_ok = responses
        .iter()
        .all(|r| r.status_code == StatusCode::OK.as_u16());
    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };

    (status, Json(responses)).into_response()
}

pub async fn handle_upload_photo(
    Extension(uploader): Extension<Arc<PhotoUploader>>,
    Path(object_key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let custom_labels = headers
        .get(CUSTOM_LABELS_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let result = uploader
        .upload(&object_key, content_type, custom_labels, body.to_vec())
        .await;

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(UploadResponse {
                message: "Photo uploaded successfully".to_string(),
                bucket: uploader.bucket().to_string(),
                object_key,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Upload of {} failed: {}", object_key, e);
            (
                failure_status(&e),
                Json(json!({
                    "message": "Error uploading photo",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
