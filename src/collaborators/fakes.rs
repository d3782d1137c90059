//! In-process stand-ins for every collaborator, shared by the module tests.

use super::{
    CollaboratorResult, DetectedLabel, IndexStore, IntentRecognizer, IntentRequest,
    Interpretation, LabelDetector, ObjectMetadata, ObjectStore, PhotoUpload,
};
use crate::error::CollaboratorError;
use crate::ingestion::types::PhotoDocument;
use crate::search::types::SearchQuery;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

fn location(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, key)
}

#[derive(Default)]
pub struct FakeObjectStore {
    pub objects: HashMap<String, ObjectMetadata>,
    pub heads: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<PhotoUpload>>,
    pub fail_puts: bool,
}

impl FakeObjectStore {
    pub fn with_object(mut self, bucket: &str, key: &str, metadata: ObjectMetadata) -> Self {
        self.objects.insert(location(bucket, key), metadata);
        self
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> CollaboratorResult<ObjectMetadata> {
        let loc = location(bucket, key);
        self.heads.lock().unwrap().push(loc.clone());
        self.objects
            .get(&loc)
            .cloned()
            .ok_or_else(|| CollaboratorError::ObjectStore(format!("no such object: {}", loc)))
    }

    async fn put_object(&self, upload: PhotoUpload) -> CollaboratorResult<()> {
        if self.fail_puts {
            return Err(CollaboratorError::ObjectStore("bucket unavailable".to_string()));
        }
        self.uploads.lock().unwrap().push(upload);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDetector {
    pub labels: HashMap<String, Vec<DetectedLabel>>,
    pub calls: Mutex<Vec<(String, i32, f32)>>,
}

impl FakeDetector {
    pub fn with_labels(mut self, bucket: &str, key: &str, labels: &[(&str, f32)]) -> Self {
        let labels = labels
            .iter()
            .map(|(name, confidence)| DetectedLabel {
                name: name.to_string(),
                confidence: *confidence,
            })
            .collect();
        self.labels.insert(location(bucket, key), labels);
        self
    }
}

#[async_trait]
impl LabelDetector for FakeDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> CollaboratorResult<Vec<DetectedLabel>> {
        let loc = location(bucket, key);
        self.calls
            .lock()
            .unwrap()
            .push((loc.clone(), max_labels, min_confidence));
        self.labels
            .get(&loc)
            .cloned()
            .ok_or_else(|| CollaboratorError::Recognition(format!("unreadable image: {}", loc)))
    }
}

#[derive(Default)]
pub struct FakeIntent {
    pub interpretation: Option<Interpretation>,
    pub fail: bool,
    pub requests: Mutex<Vec<IntentRequest>>,
}

impl FakeIntent {
    pub fn with_slots(slots: &[(&str, Option<&str>)]) -> Self {
        let slots = slots
            .iter()
            .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
            .collect();
        Self {
            interpretation: Some(Interpretation { slots }),
            ..Self::default()
        }
    }
}

#[async_trait]
impl IntentRecognizer for FakeIntent {
    async fn recognize_text(
        &self,
        request: IntentRequest,
    ) -> CollaboratorResult<Option<Interpretation>> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(CollaboratorError::Intent("bot unavailable".to_string()));
        }
        Ok(self.interpretation.clone())
    }
}

/// Index store that rejects every call.
pub struct FailingIndex;

#[async_trait]
impl IndexStore for FailingIndex {
    async fn upsert_document(&self, _doc: &PhotoDocument) -> CollaboratorResult<String> {
        Err(CollaboratorError::IndexStore("cluster red".to_string()))
    }

    async fn search(&self, _query: &SearchQuery) -> CollaboratorResult<Vec<PhotoDocument>> {
        Err(CollaboratorError::IndexStore("cluster red".to_string()))
    }
}
