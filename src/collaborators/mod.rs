//! External Collaborators Module
//!
//! Narrow interfaces to the managed services the service depends on. Each
//! collaborator is a trait so the ingestion and search services can be built
//! with real clients in `main` and with fakes in tests.
//!
//! ## Submodules
//! - **`aws`**: Object storage (S3), label detection (Rekognition) and intent
//!   recognition (Lex V2) backed by the AWS SDK.
//! - **`opensearch`**: HTTP client for an OpenSearch/Elasticsearch index.
//! - **`memory`**: In-process index store keyed by object key.

pub mod aws;
pub mod memory;
pub mod opensearch;

use crate::error::CollaboratorError;
use crate::ingestion::types::PhotoDocument;
use crate::search::types::SearchQuery;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

/// Object metadata returned by a HEAD request.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    /// User metadata (`x-amz-meta-*`) with the prefix removed.
    pub user_metadata: HashMap<String, String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectMetadata {
    /// Looks up a user metadata entry ignoring key case; S3 lower-cases
    /// `x-amz-meta-customLabels` to `customlabels` on the way in.
    pub fn get(&self, key: &str) -> Option<&str> {
        metadata_value(&self.user_metadata, key)
    }
}

/// Case-insensitive lookup in a user metadata map.
pub fn metadata_value<'a>(metadata: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    metadata
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

/// A photo body to store, with its content type and user metadata.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bucket: String,
    pub object_key: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub user_metadata: HashMap<String, String>,
}

/// A label proposed by the recognition collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f32,
}

/// Result of intent recognition: slot name to interpreted value, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    pub slots: BTreeMap<String, Option<String>>,
}

/// Identifies the bot, alias, locale and session of an intent request.
#[derive(Debug, Clone)]
pub struct IntentRequest {
    pub bot_id: String,
    pub bot_alias_id: String,
    pub locale_id: String,
    pub session_id: String,
    pub text: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn head_object(&self, bucket: &str, key: &str) -> CollaboratorResult<ObjectMetadata>;

    async fn put_object(&self, upload: PhotoUpload) -> CollaboratorResult<()>;
}

#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Returns labels at or above `min_confidence`, at most `max_labels` of them.
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> CollaboratorResult<Vec<DetectedLabel>>;
}

#[async_trait]
pub trait IntentRecognizer: Send + Sync {
    /// Returns the top interpretation, or `None` when the bot produced none.
    async fn recognize_text(
        &self,
        request: IntentRequest,
    ) -> CollaboratorResult<Option<Interpretation>>;
}

#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Inserts or replaces the document stored under its object key and
    /// returns the store's document id.
    async fn upsert_document(&self, doc: &PhotoDocument) -> CollaboratorResult<String>;

    async fn search(&self, query: &SearchQuery) -> CollaboratorResult<Vec<PhotoDocument>>;
}

#[cfg(test)]
pub(crate) mod fakes;
