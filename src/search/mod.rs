//! Search Service Module
//!
//! The query half of the service: turns free text into photo results.
//!
//! ## Pipeline
//! 1. **Intent**: The intent collaborator maps the text onto named slots.
//! 2. **Keywords**: Filled slot values are normalized into keywords.
//! 3. **Expansion**: Keywords are widened with singular/plural variants and
//!    combined into a single "match any" query.
//! 4. **Mapping**: Index hits are reduced to a public URL plus labels.
//!
//! ## Submodules
//! - **`engine`**: Query assembly, result mapping and the `SearchService`.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`types`**: Query and response types.

pub mod engine;
pub mod handlers;
pub mod types;
