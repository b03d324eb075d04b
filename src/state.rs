use std::sync::Arc;

use crate::clients::OllamaClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    InsightService, OllamaInsightService, ProductService, SeaOrmProductService,
};

/// Upper bound for any outbound call; individual requests set tighter limits.
pub(crate) const HTTP_TIMEOUT_SECONDS: u64 = 120;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client is reused for every model backend call to enable
/// connection pooling.
pub(crate) fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("marketplace-insights/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Process-wide dependencies, built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub product_service: Arc<dyn ProductService>,

    pub insight_service: Arc<dyn InsightService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.connection_string(),
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires services around an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(HTTP_TIMEOUT_SECONDS)?;
        let ollama = Arc::new(OllamaClient::with_shared_client(
            http_client,
            &config.ollama.base_url,
            &config.ollama.model,
        ));

        let store_arc = Arc::new(store.clone());

        let product_service = Arc::new(SeaOrmProductService::new(store_arc.clone()))
            as Arc<dyn ProductService + Send + Sync + 'static>;

        let insight_service = Arc::new(OllamaInsightService::new(store_arc, ollama))
            as Arc<dyn InsightService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            product_service,
            insight_service,
        })
    }

    /// Closes the store. Call once the server has stopped.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.store.close().await
    }
}
