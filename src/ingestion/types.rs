//! Ingestion Data Types
//!
//! The indexed document, the upload notification payload accepted on `/ingest`
//! and the per-record responses returned for it.

use crate::error::IngestionError;
use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The searchable document stored in the index, one per object key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDocument {
    pub object_key: String,
    pub bucket: String,
    #[serde(default)]
    pub created_timestamp: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

/// Storage notification batch, in the S3 event format.
///
/// Records stay raw JSON here and are decoded one at a time, so a malformed
/// record fails its own slot instead of the whole batch.
#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Object {
    pub key: String,
    /// Object user metadata, when the notifier already knows it.
    #[serde(default)]
    pub user_metadata: Option<HashMap<String, String>>,
}

/// One upload to ingest, with the object key already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadNotification {
    pub bucket: String,
    pub object_key: String,
    pub metadata: Option<HashMap<String, String>>,
    pub event_time: Option<DateTime<Utc>>,
}

impl UploadNotification {
    pub fn new(bucket: &str, object_key: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            object_key: object_key.to_string(),
            metadata: None,
            event_time: None,
        }
    }
}

impl TryFrom<serde_json::Value> for UploadNotification {
    type Error = IngestionError;

    fn try_from(record: serde_json::Value) -> Result<Self, Self::Error> {
        serde_json::from_value::<S3EventRecord>(record)
            .map(Self::from)
            .map_err(|e| IngestionError::MalformedRecord(e.to_string()))
    }
}

impl From<S3EventRecord> for UploadNotification {
    fn from(record: S3EventRecord) -> Self {
        Self {
            bucket: record.s3.bucket.name,
            object_key: decode_object_key(&record.s3.object.key),
            metadata: record.s3.object.user_metadata,
            event_time: record.event_time,
        }
    }
}

/// Event keys are form-encoded: `+` is a space and everything else is
/// percent-encoded, so `my+cat%2B1.jpg` is `my cat+1.jpg`.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Per-record result of an ingestion batch.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub status_code: u16,
    pub body: RecordBody,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordBody {
    Indexed {
        message: String,
        id: String,
        labels: BTreeSet<String>,
    },
    Failed {
        message: String,
        error: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub bucket: String,
    pub object_key: String,
}
