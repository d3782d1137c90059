//! OpenSearch / Elasticsearch index store over plain HTTP.

use super::{CollaboratorResult, IndexStore};
use crate::error::CollaboratorError;
use crate::ingestion::types::PhotoDocument;
use crate::search::types::SearchQuery;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Basic-auth credential passed through to the index store untouched.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct OpenSearchStore {
    http_client: reqwest::Client,
    host: String,
    index: String,
    credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
struct UpsertResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: PhotoDocument,
}

impl OpenSearchStore {
    pub fn new(host: &str, index: &str, credentials: Option<Credentials>) -> Self {
        Self::with_client(reqwest::Client::new(), host, index, credentials)
    }

    pub fn with_client(
        http_client: reqwest::Client,
        host: &str,
        index: &str,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            http_client,
            host: host.trim_end_matches('/').to_string(),
            index: index.to_string(),
            credentials,
        }
    }

    /// `{host}/{index}/_doc/{id}`, with the object key encoded as a single
    /// path segment so keys containing `/` stay one document.
    pub fn document_url(&self, object_key: &str) -> String {
        format!(
            "{}/{}/_doc/{}",
            self.host,
            self.index,
            utf8_percent_encode(object_key, NON_ALPHANUMERIC)
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}/{}/_search", self.host, self.index)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(&creds.password)),
            None => request,
        }
    }

    async fn read_body(response: reqwest::Response) -> CollaboratorResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CollaboratorError::IndexStore(format!(
                "index store returned {}: {}",
                status,
                body.trim()
            )));
        }
        Ok(body)
    }
}

#[async_trait]
impl IndexStore for OpenSearchStore {
    async fn upsert_document(&self, doc: &PhotoDocument) -> CollaboratorResult<String> {
        let request = self.http_client.put(self.document_url(&doc.object_key)).json(doc);
        let response = self.authorize(request).send().await?;
        let body = Self::read_body(response).await?;

        let parsed: UpsertResponse = serde_json::from_str(body.trim())?;
        tracing::debug!("Indexed {} as {}", doc.object_key, parsed.id);
        Ok(parsed.id)
    }

    async fn search(&self, query: &SearchQuery) -> CollaboratorResult<Vec<PhotoDocument>> {
        let request = self
            .http_client
            .get(self.search_url())
            .json(&query.to_dsl());
        let response = self.authorize(request).send().await?;
        let body = Self::read_body(response).await?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: SearchResponse = serde_json::from_str(body.trim())?;
        Ok(parsed.hits.hits.into_iter().map(|hit| hit.source).collect())
    }
}
