use crate::domain::ProductId;
use crate::models::{Insight, NewInsight, NewProduct, Product, ProductFilter, ProductPatch};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

const MEMORY_URL: &str = "sqlite::memory:";

/// Builds the SQLite URL for database `name` under the configured store location.
///
/// `sqlite:<dir>` becomes `sqlite:<dir>/<name>.db`. In-memory URLs are passed through.
#[must_use]
pub fn connection_string(database_url: &str, database_name: &str) -> String {
    let url = database_url.trim();
    if url.contains(":memory:") {
        return url.to_string();
    }

    let dir = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_end_matches('/');

    if dir.ends_with(".db") {
        return format!("sqlite:{dir}");
    }
    if dir.is_empty() {
        return format!("sqlite:{database_name}.db");
    }
    format!("sqlite:{dir}/{database_name}.db")
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// In-memory store for tests and throwaway runs.
    pub async fn in_memory() -> Result<Self> {
        Self::new(MEMORY_URL).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        // An in-memory database lives only as long as its connection.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Releases every pooled connection.
    pub async fn close(&self) -> Result<()> {
        self.conn.clone().close().await?;
        info!("Database connection closed");
        Ok(())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn insight_repo(&self) -> repositories::insight::InsightRepository {
        repositories::insight::InsightRepository::new(self.conn.clone())
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
        self.product_repo().create(product).await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        self.product_repo().get(id).await
    }

    pub async fn list_products(
        &self,
        skip: u64,
        limit: u64,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>> {
        self.product_repo().list(skip, limit, filter).await
    }

    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        self.product_repo().update(id, patch).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<bool> {
        self.product_repo().delete(id).await
    }

    pub async fn save_insight(&self, insight: NewInsight) -> Result<Insight> {
        self.insight_repo().save(insight).await
    }

    pub async fn list_insights_for_product(&self, product_id: &str) -> Result<Vec<Insight>> {
        self.insight_repo().list_by_product(product_id).await
    }
}
