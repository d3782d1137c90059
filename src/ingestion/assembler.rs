use super::types::PhotoDocument;
use crate::collaborators::DetectedLabel;
use crate::error::IngestionError;
use crate::labels::normalizer::{normalize, split_csv};
use chrono::{DateTime, Utc};

/// Rejects notifications that do not name an object.
pub fn check_location(object_key: &str, bucket: &str) -> Result<(), IngestionError> {
    if object_key.is_empty() {
        return Err(IngestionError::MissingObjectKey);
    }
    if bucket.is_empty() {
        return Err(IngestionError::MissingBucket);
    }
    Ok(())
}

/// Builds the index document for one photo.
///
/// Custom labels come from the comma-separated `customlabels` metadata value,
/// detected labels from the recognition collaborator. Detected labels are
/// taken as given: the confidence threshold was already applied when they were
/// requested. The creation time falls back to now when the object has no
/// modification time.
pub fn assemble(
    object_key: &str,
    bucket: &str,
    custom_labels_csv: Option<&str>,
    detected_labels: &[DetectedLabel],
    last_modified: Option<DateTime<Utc>>,
) -> Result<PhotoDocument, IngestionError> {
    check_location(object_key, bucket)?;

    let custom = custom_labels_csv.into_iter().flat_map(split_csv);
    let detected = detected_labels.iter().map(|label| label.name.as_str());
    let labels = normalize(custom.chain(detected));

    // Neither source produced anything: the recognition step most likely never ran.
    if labels.is_empty() && detected_labels.is_empty() {
        return Err(IngestionError::NoLabels {
            bucket: bucket.to_string(),
            object_key: object_key.to_string(),
        });
    }

    let created_at = last_modified.unwrap_or_else(Utc::now);

    Ok(PhotoDocument {
        object_key: object_key.to_string(),
        bucket: bucket.to_string(),
        created_timestamp: created_at.to_rfc3339(),
        labels,
    })
}
