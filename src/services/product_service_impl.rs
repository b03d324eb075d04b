//! `SeaORM` implementation of the [`ProductService`] trait.

use crate::db::Store;
use crate::domain::ProductId;
use crate::models::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::services::product_service::{
    ProductError, ProductService, validate_new_product, validate_patch,
};
use std::sync::Arc;

pub struct SeaOrmProductService {
    store: Arc<Store>,
}

impl SeaOrmProductService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ProductService for SeaOrmProductService {
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductError> {
        validate_new_product(&product)?;
        Ok(self.store.create_product(product).await?)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ProductError> {
        self.store
            .get_product(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    async fn list_products(
        &self,
        skip: u64,
        limit: u64,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.list_products(skip, limit, &filter).await?)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ProductError> {
        validate_patch(&patch)?;
        self.store
            .update_product(id, patch)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        if self.store.delete_product(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound(id))
        }
    }
}
