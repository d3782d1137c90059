//! Label Processing Module
//!
//! The pure, collaborator-free text logic shared by both halves of the service.
//!
//! ## Submodules
//! - **`normalizer`**: Turns raw labels (custom metadata or detected entities) into a
//!   trimmed, lower-cased, deduplicated set.
//! - **`morphology`**: Widens a keyword set with singular/plural variants so that the
//!   exact-token matching of the index store still finds `cats` when asked for `cat`.

pub mod morphology;
pub mod normalizer;

pub use morphology::expand;
pub use normalizer::normalize;
