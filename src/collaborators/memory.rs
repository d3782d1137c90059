//! In-process index store.
//!
//! Documents are keyed by object key, so re-ingesting a photo replaces its
//! previous document. Matching mirrors the disjunctive query semantics of the
//! real index: a document is a hit when any query term equals any label.

use super::{CollaboratorResult, IndexStore};
use crate::ingestion::types::PhotoDocument;
use crate::search::types::SearchQuery;
use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryIndexStore {
    documents: DashMap<String, PhotoDocument>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object_key: &str) -> Option<PhotoDocument> {
        self.documents.get(object_key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn upsert_document(&self, doc: &PhotoDocument) -> CollaboratorResult<String> {
        self.documents.insert(doc.object_key.clone(), doc.clone());
        Ok(doc.object_key.clone())
    }

    async fn search(&self, query: &SearchQuery) -> CollaboratorResult<Vec<PhotoDocument>> {
        let mut hits: Vec<PhotoDocument> = self
            .documents
            .iter()
            .filter(|entry| {
                let matched = entry
                    .value()
                    .labels
                    .iter()
                    .filter(|label| query.terms.contains(*label))
                    .count();
                matched >= query.minimum_should_match
            })
            .map(|entry| entry.value().clone())
            .collect();

        hits.sort_by(|a, b| a.object_key.cmp(&b.object_key));
        Ok(hits)
    }
}
