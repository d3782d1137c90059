//! Ingestion Service Module
//!
//! Turns storage upload notifications into labelled, searchable documents.
//!
//! ## Workflow
//! 1. **Decode**: Object keys from the notification are form-decoded.
//! 2. **Metadata**: Custom labels and the modification time are read from object storage.
//! 3. **Recognition**: The label detector proposes labels above its confidence threshold.
//! 4. **Assembly**: Both label sources are merged and normalized into a `PhotoDocument`.
//! 5. **Indexing**: The document is upserted under its object key.
//!
//! Photo uploads (`PUT /photos/{key}`) only write to object storage; indexing
//! happens when the storage notification for that object arrives.

pub mod assembler;
pub mod handlers;
pub mod service;
pub mod types;
