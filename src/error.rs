//! Error types for the photo-search service.
//!
//! Every failure is classified into one of three kinds (see [`ErrorKind`]).
//! Components return their own narrow error types; only the HTTP boundary
//! turns a kind into a status code.

use thiserror::Error;

/// Coarse classification used by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input (missing query, empty object key). Surfaced as 4xx.
    Validation,
    /// A recognition, intent, storage or index call failed. Surfaced as 5xx.
    Collaborator,
    /// The data itself is unusable (no labels, no keywords).
    DataQuality,
}

/// Failures while turning an upload notification into a [`PhotoDocument`].
///
/// [`PhotoDocument`]: crate::ingestion::types::PhotoDocument
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionError {
    #[error("object key is empty")]
    MissingObjectKey,

    #[error("bucket name is empty")]
    MissingBucket,

    #[error("malformed event record: {0}")]
    MalformedRecord(String),

    #[error("no labels found for s3://{bucket}/{object_key}")]
    NoLabels { bucket: String, object_key: String },
}

/// Returned by the query assembler when intent parsing produced no keywords.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no keywords to search for")]
pub struct EmptyQueryError;

/// A call to an external collaborator failed or returned malformed data.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("object storage error: {0}")]
    ObjectStore(String),

    #[error("label detection error: {0}")]
    Recognition(String),

    #[error("intent recognition error: {0}")]
    Intent(String),

    #[error("index store error: {0}")]
    IndexStore(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Umbrella error returned by the ingestion and search services.
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    EmptyQuery(#[from] EmptyQueryError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl PhotoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhotoError::Validation(_) => ErrorKind::Validation,
            PhotoError::Ingestion(IngestionError::MissingObjectKey)
            | PhotoError::Ingestion(IngestionError::MissingBucket)
            | PhotoError::Ingestion(IngestionError::MalformedRecord(_)) => ErrorKind::Validation,
            PhotoError::Ingestion(IngestionError::NoLabels { .. }) => ErrorKind::DataQuality,
            PhotoError::EmptyQuery(_) => ErrorKind::DataQuality,
            PhotoError::Collaborator(_) => ErrorKind::Collaborator,
        }
    }
}

pub type Result<T> = std::result::Result<T, PhotoError>;
