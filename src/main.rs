use clap::Parser;
use photo_search::collaborators::aws::{
    load_sdk_config, LexIntentRecognizer, RekognitionDetector, S3ObjectStore,
};
use photo_search::collaborators::memory::MemoryIndexStore;
use photo_search::collaborators::opensearch::OpenSearchStore;
use photo_search::collaborators::{IndexStore, ObjectStore};
use photo_search::config::{IndexBackend, Settings};
use photo_search::ingestion::service::{IngestionService, PhotoUploader};
use photo_search::search::engine::SearchService;
use photo_search::server::{router, AppServices};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::parse();

    // 1. Collaborator clients:
    let storage_config = load_sdk_config(settings.storage_region.as_deref()).await;
    let recognition_config = load_sdk_config(settings.recognition_region.as_deref()).await;
    let intent_config = load_sdk_config(settings.intent_region.as_deref()).await;

    let objects: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(&storage_config));
    let detector = Arc::new(RekognitionDetector::new(&recognition_config));
    let intent = Arc::new(LexIntentRecognizer::new(&intent_config));

    let index: Arc<dyn IndexStore> = match settings.index_backend {
        IndexBackend::Opensearch => {
            tracing::info!(
                "Index store: {}/{}",
                settings.index_host,
                settings.index_name
            );
            Arc::new(OpenSearchStore::new(
                &settings.index_host,
                &settings.index_name,
                settings.index_credentials(),
            ))
        }
        IndexBackend::Memory => {
            tracing::warn!("Using in-memory index store; documents are lost on restart");
            Arc::new(MemoryIndexStore::new())
        }
    };

    // 2. Services:
    let services = AppServices {
        ingestion: Arc::new(IngestionService::new(
            objects.clone(),
            detector,
            index.clone(),
            settings.recognition_limits(),
        )),
        search: Arc::new(SearchService::new(intent, index, settings.intent_bot())),
        uploader: Arc::new(PhotoUploader::new(objects, &settings.upload_bucket)),
    };

    // 3. HTTP server:
    let app = router(services);

    tracing::info!("HTTP server listening on {}", settings.bind);
    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
