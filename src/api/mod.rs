use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{InsightService, ProductService};
use crate::state::SharedState;

mod error;
mod insights;
mod observability;
mod products;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn product_service(&self) -> &Arc<dyn ProductService> {
        &self.shared.product_service
    }

    #[must_use]
    pub fn insight_service(&self) -> &Arc<dyn InsightService> {
        &self.shared.insight_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .nest("/api/v1", api_routes())
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/insights/generate", post(insights::generate_insight))
        .route(
            "/insights/product/{product_id}",
            get(insights::get_product_insights),
        )
        .route("/insights/compare", post(insights::compare_products))
        .route("/insights/models", get(insights::list_models))
}
