use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;

/// The document field every query term is matched against.
pub const LABELS_FIELD: &str = "labels";

/// A disjunctive keyword query: a document matches when at least
/// `minimum_should_match` of `terms` match its `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub field: String,
    pub terms: BTreeSet<String>,
    pub minimum_should_match: usize,
}

impl SearchQuery {
    /// Any-of query over the `labels` field.
    pub fn match_any(terms: BTreeSet<String>) -> Self {
        Self {
            field: LABELS_FIELD.to_string(),
            terms,
            minimum_should_match: 1,
        }
    }

    /// Renders the query as an OpenSearch `bool`/`should` body.
    pub fn to_dsl(&self) -> serde_json::Value {
        let should: Vec<serde_json::Value> = self
            .terms
            .iter()
            .map(|term| {
                let mut clause = serde_json::Map::new();
                clause.insert(self.field.clone(), json!(term));
                json!({ "match": clause })
            })
            .collect();

        json!({
            "query": {
                "bool": {
                    "should": should,
                    "minimum_should_match": self.minimum_should_match,
                }
            }
        })
    }
}

/// Public view of an indexed photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn found(results: Vec<SearchResult>) -> Self {
        Self {
            message: None,
            results,
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            results: Vec::new(),
        }
    }
}
