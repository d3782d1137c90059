//! Photo Labelling and Search Service Library
//!
//! This library crate defines the modules that make up the service. It serves
//! as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`labels`**: Pure label logic. Normalizes raw labels and expands keywords
//!   with singular/plural variants.
//! - **`ingestion`**: The upload path. Merges custom metadata labels with
//!   detected labels into a `PhotoDocument` and indexes it.
//! - **`search`**: The query path. Disambiguates free text through the intent
//!   bot, builds a "match any" query and maps hits to public results.
//! - **`collaborators`**: Interfaces and clients for object storage, label
//!   detection, intent recognition and the index store.
//! - **`server`**: The Axum router exposing both paths over HTTP.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod labels;
pub mod search;
pub mod server;
