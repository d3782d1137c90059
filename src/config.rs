//! Command-line and environment configuration.
//!
//! Every flag can also be set through its `PHOTO_SEARCH_*` environment variable.

use crate::collaborators::opensearch::Credentials;
use crate::ingestion::service::RecognitionLimits;
use crate::search::engine::IntentBot;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexBackend {
    /// OpenSearch / Elasticsearch over HTTP.
    Opensearch,
    /// In-process map; documents are lost on restart.
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "photo-search", version, about = "Photo labelling and search service")]
pub struct Settings {
    /// Address the HTTP server listens on.
    #[arg(long, env = "PHOTO_SEARCH_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Region of the photo bucket.
    #[arg(long, env = "PHOTO_SEARCH_STORAGE_REGION")]
    pub storage_region: Option<String>,

    /// Region of the label detection service.
    #[arg(long, env = "PHOTO_SEARCH_RECOGNITION_REGION")]
    pub recognition_region: Option<String>,

    /// Region of the intent bot.
    #[arg(long, env = "PHOTO_SEARCH_INTENT_REGION")]
    pub intent_region: Option<String>,

    /// Bucket photo uploads are written to.
    #[arg(long, env = "PHOTO_SEARCH_UPLOAD_BUCKET", default_value = "photos")]
    pub upload_bucket: String,

    #[arg(long, env = "PHOTO_SEARCH_MAX_LABELS", default_value_t = 100)]
    pub max_labels: i32,

    #[arg(long, env = "PHOTO_SEARCH_MIN_CONFIDENCE", default_value_t = 70.0)]
    pub min_confidence: f32,

    #[arg(long, env = "PHOTO_SEARCH_BOT_ID")]
    pub bot_id: String,

    #[arg(long, env = "PHOTO_SEARCH_BOT_ALIAS_ID", default_value = "TSTALIASID")]
    pub bot_alias_id: String,

    #[arg(long, env = "PHOTO_SEARCH_BOT_LOCALE", default_value = "en_US")]
    pub bot_locale: String,

    #[arg(long, value_enum, env = "PHOTO_SEARCH_INDEX_BACKEND", default_value = "opensearch")]
    pub index_backend: IndexBackend,

    /// Base URL of the index store.
    #[arg(long, env = "PHOTO_SEARCH_INDEX_HOST", default_value = "http://localhost:9200")]
    pub index_host: String,

    #[arg(long, env = "PHOTO_SEARCH_INDEX_NAME", default_value = "photos")]
    pub index_name: String,

    #[arg(long, env = "PHOTO_SEARCH_INDEX_USERNAME")]
    pub index_username: Option<String>,

    #[arg(long, env = "PHOTO_SEARCH_INDEX_PASSWORD", hide_env_values = true)]
    pub index_password: Option<String>,
}

impl Settings {
    pub fn recognition_limits(&self) -> RecognitionLimits {
        RecognitionLimits {
            max_labels: self.max_labels,
            min_confidence: self.min_confidence,
        }
    }

    pub fn intent_bot(&self) -> IntentBot {
        IntentBot {
            bot_id: self.bot_id.clone(),
            bot_alias_id: self.bot_alias_id.clone(),
            locale_id: self.bot_locale.clone(),
        }
    }

    /// Basic-auth credentials, present only when a username is configured.
    pub fn index_credentials(&self) -> Option<Credentials> {
        self.index_username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: self.index_password.clone().unwrap_or_default(),
        })
    }
}
