//! Router Tests
//!
//! Drives the full router with `oneshot` against fake collaborators.
//!
//! ## Test Scopes
//! - **Search Endpoint**: Status and body for each error kind, CORS header.
//! - **Ingest Endpoint**: Per-record responses, including malformed records.
//! - **Upload Endpoint**: Bytes and custom labels reaching object storage.

#[cfg(test)]
mod tests {
    use crate::collaborators::fakes::{FailingIndex, FakeDetector, FakeIntent, FakeObjectStore};
    use crate::collaborators::memory::MemoryIndexStore;
    use crate::collaborators::{IndexStore, ObjectMetadata};
    use crate::ingestion::service::{IngestionService, PhotoUploader, RecognitionLimits};
    use crate::ingestion::types::PhotoDocument;
    use crate::search::engine::{IntentBot, SearchService};
    use crate::server::{router, AppServices};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn bot() -> IntentBot {
        IntentBot {
            bot_id: "BOT".to_string(),
            bot_alias_id: "ALIAS".to_string(),
            locale_id: "en_US".to_string(),
        }
    }

    fn services(
        intent: FakeIntent,
        objects: Arc<FakeObjectStore>,
        detector: FakeDetector,
        index: Arc<dyn IndexStore>,
    ) -> AppServices {
        AppServices {
            ingestion: Arc::new(IngestionService::new(
                objects.clone(),
                Arc::new(detector),
                index.clone(),
                RecognitionLimits::default(),
            )),
            search: Arc::new(SearchService::new(Arc::new(intent), index, bot())),
            uploader: Arc::new(PhotoUploader::new(objects, "photos")),
        }
    }

    fn default_services() -> AppServices {
        services(
            FakeIntent::default(),
            Arc::new(FakeObjectStore::default()),
            FakeDetector::default(),
            Arc::new(MemoryIndexStore::new()),
        )
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::ORIGIN, "https://photos.example.com")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    // ============================================================
    // SEARCH ENDPOINT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_search_missing_q_is_400() {
        let response = router(default_services()).oneshot(get("/search")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let body = json_body(response).await;
        assert_eq!(body["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_search_empty_q_is_400() {
        let response = router(default_services()).oneshot(get("/search?q=")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_without_keywords_is_empty_200() {
        let response = router(default_services())
            .oneshot(get("/search?q=hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["results"], serde_json::json!([]));
        assert_eq!(body["message"], "No valid keywords found in query");
    }

    #[tokio::test]
    async fn test_search_returns_results() {
        let index = Arc::new(MemoryIndexStore::new());
        index
            .upsert_document(&PhotoDocument {
                object_key: "cat.jpg".to_string(),
                bucket: "photos".to_string(),
                created_timestamp: String::new(),
                labels: ["cat", "outdoor"].iter().map(|s| s.to_string()).collect(),
            })
            .await
            .unwrap();

        let app = router(services(
            FakeIntent::with_slots(&[("animal", Some("cat"))]),
            Arc::new(FakeObjectStore::default()),
            FakeDetector::default(),
            index,
        ));
        let response = app.oneshot(get("/search?q=show%20me%20cats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "results": [
                    {
                        "url": "https://photos.s3.amazonaws.com/cat.jpg",
                        "labels": ["cat", "outdoor"]
                    }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_search_collaborator_failure_is_500() {
        let app = router(services(
            FakeIntent::with_slots(&[("animal", Some("cat"))]),
            Arc::new(FakeObjectStore::default()),
            FakeDetector::default(),
            Arc::new(FailingIndex),
        ));
        let response = app.oneshot(get("/search?q=cats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["results"], serde_json::json!([]));
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error searching photos"));
    }

    // ============================================================
    // INGEST ENDPOINT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_ingest_batch_reports_per_record() {
        let objects = Arc::new(FakeObjectStore::default().with_object(
            "photos",
            "my dog.jpg",
            ObjectMetadata {
                user_metadata: HashMap::from([(
                    "customlabels".to_string(),
                    "Dog, Park".to_string(),
                )]),
                last_modified: None,
            },
        ));
        let detector = FakeDetector::default().with_labels("photos", "my dog.jpg", &[("Tree", 90.0)]);
        let app = router(services(
            FakeIntent::default(),
            objects,
            detector,
            Arc::new(MemoryIndexStore::new()),
        ));

        let event = serde_json::json!({
            "Records": [
                { "s3": { "bucket": { "name": "photos" }, "object": { "key": "my+dog.jpg" } } },
                { "s3": { "bucket": { "name": "photos" }, "object": { "key": "gone.jpg" } } }
            ]
        });
        let response = app.oneshot(post_json("/ingest", event.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::MULTI_STATUS);

        let body = json_body(response).await;
        assert_eq!(body[0]["statusCode"], 200);
        assert_eq!(body[0]["body"]["message"], "Image processed successfully");
        assert_eq!(body[0]["body"]["id"], "my dog.jpg");
        assert_eq!(body[0]["body"]["labels"], serde_json::json!(["dog", "park", "tree"]));
        assert_eq!(body[1]["statusCode"], 500);
        assert_eq!(body[1]["body"]["message"], "Error processing image");
        assert!(body[1]["body"]["error"].as_str().unwrap().contains("gone.jpg"));
    }

    #[tokio::test]
    async fn test_ingest_malformed_record_fails_only_its_slot() {
        let objects = Arc::new(FakeObjectStore::default().with_object(
            "photos",
            "a.jpg",
            ObjectMetadata {
                user_metadata: HashMap::from([("customlabels".to_string(), "Cat".to_string())]),
                last_modified: None,
            },
        ));
        let detector = FakeDetector::default().with_labels("photos", "a.jpg", &[]);
        let index = Arc::new(MemoryIndexStore::new());
        let app = router(services(FakeIntent::default(), objects, detector, index.clone()));

        let event = serde_json::json!({
            "Records": [
                { "s3": { "bucket": { "name": "photos" }, "object": { "key": "a.jpg" } } },
                { "s3": { "object": { "key": "b.jpg" } } }
            ]
        });
        let response = app.oneshot(post_json("/ingest", event.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::MULTI_STATUS);

        let body = json_body(response).await;
        assert_eq!(body[0]["statusCode"], 200);
        assert_eq!(body[1]["statusCode"], 400);
        assert_eq!(body[1]["body"]["message"], "Error processing image");
        assert!(body[1]["body"]["error"]
            .as_str()
            .unwrap()
            .contains("malformed event record"));
        assert!(index.get("a.jpg").is_some());
    }

    #[tokio::test]
    async fn test_ingest_invalid_body_is_json_400() {
        let response = router(default_services())
            .oneshot(post_json("/ingest", "not json".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Invalid ingestion event");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_ingest_empty_batch_is_ok() {
        let response = router(default_services())
            .oneshot(post_json("/ingest", r#"{"Records": []}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    // ============================================================
    // UPLOAD ENDPOINT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_upload_photo() {
        let objects = Arc::new(FakeObjectStore::default());
        let app = router(services(
            FakeIntent::default(),
            objects.clone(),
            FakeDetector::default(),
            Arc::new(MemoryIndexStore::new()),
        ));

        let request = Request::builder()
            .method("PUT")
            .uri("/photos/trips/cat.jpg")
            .header(header::CONTENT_TYPE, "image/jpeg")
            .header("x-amz-meta-customLabels", "Cat,Garden")
            .body(Body::from(vec![0xffu8, 0xd8, 0xff]))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["objectKey"], "trips/cat.jpg");

        let uploads = objects.uploads.lock().unwrap();
        assert_eq!(uploads[0].object_key, "trips/cat.jpg");
        assert_eq!(
            uploads[0].user_metadata.get("customlabels").map(String::as_str),
            Some("Cat,Garden")
        );
    }

    #[tokio::test]
    async fn test_upload_storage_failure_is_500() {
        let objects = Arc::new(FakeObjectStore {
            fail_puts: true,
            ..FakeObjectStore::default()
        });
        let app = router(services(
            FakeIntent::default(),
            objects,
            FakeDetector::default(),
            Arc::new(MemoryIndexStore::new()),
        ));

        let request = Request::builder()
            .method("PUT")
            .uri("/photos/cat.jpg")
            .body(Body::from(vec![1u8]))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Error uploading photo");
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(default_services()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }
}
