use super::assembler::{assemble, check_location};
use super::types::{PhotoDocument, UploadNotification};
use crate::collaborators::{
    metadata_value, IndexStore, LabelDetector, ObjectStore, PhotoUpload,
};
use crate::error::{PhotoError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Object metadata key holding the comma-separated custom labels.
pub const CUSTOM_LABELS_KEY: &str = "customlabels";

/// Limits passed to the recognition collaborator on every call.
#[derive(Debug, Clone, Copy)]
pub struct RecognitionLimits {
    pub max_labels: i32,
    pub min_confidence: f32,
}

impl Default for RecognitionLimits {
    fn default() -> Self {
        Self {
            max_labels: 100,
            min_confidence: 70.0,
        }
    }
}

/// A document that made it into the index.
#[derive(Debug, Clone)]
pub struct IngestedPhoto {
    pub id: String,
    pub document: PhotoDocument,
}

/// Ingestion path: upload notification to labelled, indexed document.
///
/// Holds no state between notifications; ingesting the same object key twice
/// replaces the earlier document.
pub struct IngestionService {
    objects: Arc<dyn ObjectStore>,
    detector: Arc<dyn LabelDetector>,
    index: Arc<dyn IndexStore>,
    limits: RecognitionLimits,
}

impl IngestionService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        detector: Arc<dyn LabelDetector>,
        index: Arc<dyn IndexStore>,
        limits: RecognitionLimits,
    ) -> Self {
        Self {
            objects,
            detector,
            index,
            limits,
        }
    }

    pub async fn ingest(&self, upload: &UploadNotification) -> Result<IngestedPhoto> {
        let bucket = upload.bucket.as_str();
        let key = upload.object_key.as_str();
        check_location(key, bucket)?;

        let (custom_labels, last_modified) = match &upload.metadata {
            Some(metadata) => (
                metadata_value(metadata, CUSTOM_LABELS_KEY).map(str::to_string),
                upload.event_time,
            ),
            None => {
                let head = self.objects.head_object(bucket, key).await?;
                (
                    head.get(CUSTOM_LABELS_KEY).map(str::to_string),
                    head.last_modified,
                )
            }
        };

        let detected = self
            .detector
            .detect_labels(
                bucket,
                key,
                self.limits.max_labels,
                self.limits.min_confidence,
            )
            .await?;

        let document = assemble(
            key,
            bucket,
            custom_labels.as_deref(),
            &detected,
            last_modified,
        )?;

        let id = self.index.upsert_document(&document).await?;
        tracing::info!(
            "Indexed s3://{}/{} as {} with labels {:?}",
            bucket,
            key,
            id,
            document.labels
        );

        Ok(IngestedPhoto { id, document })
    }

    /// Ingests every decoded record in order. A record that failed to decode
    /// or to ingest is reported in its slot and never stops the ones after it.
    pub async fn ingest_batch(
        &self,
        uploads: Vec<Result<UploadNotification>>,
    ) -> Vec<Result<IngestedPhoto>> {
        let mut results = Vec::with_capacity(uploads.len());
        for (slot, upload) in uploads.into_iter().enumerate() {
            let result = match upload {
                Ok(upload) => {
                    let result = self.ingest(&upload).await;
                    if let Err(e) = &result {
                        tracing::error!(
                            "Error processing s3://{}/{}: {}",
                            upload.bucket,
                            upload.object_key,
                            e
                        );
                    }
                    result
                }
                Err(e) => {
                    tracing::error!("Skipping record {}: {}", slot, e);
                    Err(e)
                }
            };
            results.push(result);
        }
        results
    }
}

/// Stores uploaded photo bytes in the configured bucket, carrying custom
/// labels as object metadata for the ingestion path to pick up.
pub struct PhotoUploader {
    objects: Arc<dyn ObjectStore>,
    bucket: String,
}

impl PhotoUploader {
    pub fn new(objects: Arc<dyn ObjectStore>, bucket: &str) -> Self {
        Self {
            objects,
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn upload(
        &self,
        object_key: &str,
        content_type: Option<String>,
        custom_labels: Option<String>,
        body: Vec<u8>,
    ) -> Result<()> {
        check_location(object_key, &self.bucket)?;
        if body.is_empty() {
            return Err(PhotoError::Validation("photo body is empty".to_string()));
        }

        let mut user_metadata = HashMap::new();
        if let Some(labels) = custom_labels.filter(|l| !l.trim().is_empty()) {
            user_metadata.insert(CUSTOM_LABELS_KEY.to_string(), labels);
        }

        self.objects
            .put_object(PhotoUpload {
                bucket: self.bucket.clone(),
                object_key: object_key.to_string(),
                content_type,
                body,
                user_metadata,
            })
            .await?;
        Ok(())
    }
}
