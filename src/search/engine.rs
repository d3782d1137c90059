use super::types::{SearchQuery, SearchResult};
use crate::collaborators::{IndexStore, IntentRecognizer, IntentRequest, Interpretation};
use crate::error::{EmptyQueryError, PhotoError, Result};
use crate::ingestion::types::PhotoDocument;
use crate::labels::{expand, normalize};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Characters left as-is when an object key is placed in a URL path.
const KEY_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds the disjunctive query for a set of disambiguated keywords.
pub fn assemble_query(keywords: &BTreeSet<String>) -> std::result::Result<SearchQuery, EmptyQueryError> {
    if keywords.is_empty() {
        return Err(EmptyQueryError);
    }
    Ok(SearchQuery::match_any(expand(keywords)))
}

/// Collects the interpreted slot values of an interpretation as keywords.
pub fn extract_keywords(interpretation: &Interpretation) -> BTreeSet<String> {
    normalize(interpretation.slots.values().flatten())
}

/// Public URL of an object in a virtual-hosted S3 bucket.
pub fn photo_url(bucket: &str, object_key: &str) -> String {
    format!(
        "https://{}.s3.amazonaws.com/{}",
        bucket,
        utf8_percent_encode(object_key, KEY_PATH)
    )
}

impl From<&PhotoDocument> for SearchResult {
    fn from(doc: &PhotoDocument) -> Self {
        SearchResult {
            url: photo_url(&doc.bucket, &doc.object_key),
            labels: doc.labels.clone(),
        }
    }
}

/// Maps index hits to public results, one to one and lazily. The returned
/// iterator can be cloned to walk the hits again.
pub fn map_hits(hits: &[PhotoDocument]) -> impl Iterator<Item = SearchResult> + Clone + '_ {
    hits.iter().map(SearchResult::from)
}

/// Intent bot coordinates used for every query.
#[derive(Debug, Clone)]
pub struct IntentBot {
    pub bot_id: String,
    pub bot_alias_id: String,
    pub locale_id: String,
}

/// Query path: free text to intent slots to expanded keywords to results.
pub struct SearchService {
    intent: Arc<dyn IntentRecognizer>,
    index: Arc<dyn IndexStore>,
    bot: IntentBot,
}

impl SearchService {
    pub fn new(
        intent: Arc<dyn IntentRecognizer>,
        index: Arc<dyn IndexStore>,
        bot: IntentBot,
    ) -> Self {
        Self { intent, index, bot }
    }

    /// Asks the intent bot for the keywords in `text`. Every call uses a new
    /// session so concurrent queries never share bot state.
    pub async fn keywords(&self, text: &str) -> Result<BTreeSet<String>> {
        let request = IntentRequest {
            bot_id: self.bot.bot_id.clone(),
            bot_alias_id: self.bot.bot_alias_id.clone(),
            locale_id: self.bot.locale_id.clone(),
            session_id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
        };

        let interpretation = self.intent.recognize_text(request).await?;
        Ok(interpretation
            .as_ref()
            .map(extract_keywords)
            .unwrap_or_default())
    }

    pub async fn search(&self, text: &str) -> Result<Vec<SearchResult>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PhotoError::Validation("missing query parameter".to_string()));
        }

        let keywords = self.keywords(text).await?;
        tracing::debug!("Keywords for {:?}: {:?}", text, keywords);

        let query = assemble_query(&keywords)?;
        tracing::info!("Searching for {} expanded keywords", query.terms.len());

        let hits = self.index.search(&query).await?;
        Ok(map_hits(&hits).collect())
    }
}
