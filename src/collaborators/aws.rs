//! AWS-backed collaborators: S3 object storage, Rekognition label detection
//! and Lex V2 intent recognition.

use super::{
    CollaboratorResult, DetectedLabel, IntentRecognizer, IntentRequest, Interpretation,
    LabelDetector, ObjectMetadata, ObjectStore, PhotoUpload,
};
use crate::error::CollaboratorError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use chrono::DateTime;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Loads shared AWS configuration from the default provider chain, pinned to
/// `region` when one is given.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> CollaboratorResult<ObjectMetadata> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                CollaboratorError::ObjectStore(format!(
                    "head s3://{}/{}: {}",
                    bucket,
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        debug!("Object exists: s3://{}/{}", bucket, key);

        let user_metadata: Option<&HashMap<String, String>> = output.metadata().into();
        let user_metadata = user_metadata.cloned().unwrap_or_default();
        let last_modified = output
            .last_modified()
            .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()));

        Ok(ObjectMetadata {
            user_metadata,
            last_modified,
        })
    }

    async fn put_object(&self, upload: PhotoUpload) -> CollaboratorResult<()> {
        let size = upload.body.len();
        self.client
            .put_object()
            .bucket(&upload.bucket)
            .key(&upload.object_key)
            .set_content_type(upload.content_type)
            .set_metadata(Some(upload.user_metadata))
            .body(ByteStream::from(upload.body))
            .send()
            .await
            .map_err(|e| {
                CollaboratorError::ObjectStore(format!(
                    "put s3://{}/{}: {}",
                    upload.bucket,
                    upload.object_key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        info!(
            "Stored s3://{}/{} ({} bytes)",
            upload.bucket, upload.object_key, size
        );
        Ok(())
    }
}

pub struct RekognitionDetector {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionDetector {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_rekognition::Client::new(config),
        }
    }
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> CollaboratorResult<Vec<DetectedLabel>> {
        let image = Image::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(key).build())
            .build();

        let output = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(max_labels)
            .min_confidence(min_confidence)
            .send()
            .await
            .map_err(|e| {
                CollaboratorError::Recognition(format!(
                    "detect labels for s3://{}/{}: {}",
                    bucket,
                    key,
                    aws_sdk_rekognition::error::DisplayErrorContext(&e)
                ))
            })?;

        // The threshold is enforced here, at the boundary, and nowhere else.
        let labels: Vec<DetectedLabel> = output
            .labels()
            .iter()
            .filter_map(|label| {
                Some(DetectedLabel {
                    name: label.name()?.to_string(),
                    confidence: label.confidence().unwrap_or_default(),
                })
            })
            .filter(|label| label.confidence >= min_confidence)
            .collect();

        debug!(
            "Detected {} labels for s3://{}/{}",
            labels.len(),
            bucket,
            key
        );
        Ok(labels)
    }
}

pub struct LexIntentRecognizer {
    client: aws_sdk_lexruntimev2::Client,
}

impl LexIntentRecognizer {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_lexruntimev2::Client::new(config),
        }
    }
}

#[async_trait]
impl IntentRecognizer for LexIntentRecognizer {
    async fn recognize_text(
        &self,
        request: IntentRequest,
    ) -> CollaboratorResult<Option<Interpretation>> {
        let output = self
            .client
            .recognize_text()
            .bot_id(request.bot_id)
            .bot_alias_id(request.bot_alias_id)
            .locale_id(request.locale_id)
            .session_id(request.session_id)
            .text(request.text)
            .send()
            .await
            .map_err(|e| {
                CollaboratorError::Intent(format!(
                    "recognize text: {}",
                    aws_sdk_lexruntimev2::error::DisplayErrorContext(&e)
                ))
            })?;

        let Some(intent) = output.interpretations().first().and_then(|i| i.intent()) else {
            return Ok(None);
        };

        let slots: Option<&HashMap<String, aws_sdk_lexruntimev2::types::Slot>> =
            intent.slots().into();

        let slots: BTreeMap<String, Option<String>> = slots
            .into_iter()
            .flatten()
            .map(|(name, slot)| {
                let value = slot.value().and_then(|value| {
                    let interpreted: Option<&str> = value.interpreted_value().into();
                    interpreted.map(str::to_string)
                });
                (name.clone(), value)
            })
            .collect();

        Ok(Some(Interpretation { slots }))
    }
}
