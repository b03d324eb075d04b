//! Domain service for the product catalogue.

use crate::domain::ProductId;
use crate::models::{NewProduct, Product, ProductFilter, ProductPatch};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound(ProductId),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ProductError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for product CRUD.
///
/// # Examples
///
/// ```rust,ignore
/// use marketplace_insights::services::{ProductError, ProductService};
/// use marketplace_insights::models::NewProduct;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn ProductService>) -> Result<(), ProductError> {
///     let created = service.create_product(NewProduct::new("Widget", "Acme")).await?;
///     let _same = service.get_product(created.id).await?;
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait ProductService: Send + Sync {
    /// Validates and stores a new product.
    ///
    /// # Errors
    ///
    /// - Returns [`ProductError::Validation`] for a blank name or marketplace or a bad price
    /// - Returns [`ProductError::Database`] on storage failures
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductError>;

    /// # Errors
    ///
    /// - Returns [`ProductError::NotFound`] if no product has this id
    /// - Returns [`ProductError::Database`] on storage failures
    async fn get_product(&self, id: ProductId) -> Result<Product, ProductError>;

    /// Lists products in insertion order with exact-match filters.
    async fn list_products(
        &self,
        skip: u64,
        limit: u64,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, ProductError>;

    /// Merges `patch` into the stored product and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// - Returns [`ProductError::NotFound`] if no product has this id
    /// - Returns [`ProductError::Validation`] if a supplied field is invalid
    async fn update_product(&self, id: ProductId, patch: ProductPatch)
    -> Result<Product, ProductError>;

    /// Deletes the product. Insights that reference it are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NotFound`] if nothing was deleted.
    async fn delete_product(&self, id: ProductId) -> Result<(), ProductError>;
}

fn check_required(field: &str, value: &str) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(ProductError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn check_price(price: Option<f64>) -> Result<(), ProductError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(ProductError::Validation(
            "price must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Pure validation of a create payload.
pub fn validate_new_product(product: &NewProduct) -> Result<(), ProductError> {
    check_required("name", &product.name)?;
    check_required("marketplace", &product.marketplace)?;
    check_price(product.price)
}

/// Pure validation of the fields a patch supplies.
pub fn validate_patch(patch: &ProductPatch) -> Result<(), ProductError> {
    if let Some(name) = &patch.name {
        check_required("name", name)?;
    }
    if let Some(marketplace) = &patch.marketplace {
        check_required("marketplace", marketplace)?;
    }
    if let Some(price) = patch.price {
        check_price(price)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_required_fields() {
        let err = validate_new_product(&NewProduct::new("  ", "Acme")).unwrap_err();
        assert!(matches!(err, ProductError::Validation(ref m) if m == "name must not be empty"));

        let err = validate_new_product(&NewProduct::new("Widget", "")).unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[test]
    fn rejects_negative_or_non_finite_price() {
        let mut product = NewProduct::new("Widget", "Acme");
        product.price = Some(-1.0);
        assert!(validate_new_product(&product).is_err());

        product.price = Some(f64::NAN);
        assert!(validate_new_product(&product).is_err());

        product.price = Some(0.0);
        assert!(validate_new_product(&product).is_ok());
    }

    #[test]
    fn patch_validation_only_checks_supplied_fields() {
        assert!(validate_patch(&ProductPatch::default()).is_ok());

        let clear_price = ProductPatch {
            price: Some(None),
            ..Default::default()
        };
        assert!(validate_patch(&clear_price).is_ok());

        let blank_name = ProductPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_patch(&blank_name).is_err());
    }

    #[test]
    fn anyhow_errors_become_database_errors() {
        let err: ProductError = anyhow::anyhow!("disk full").context("insert failed").into();
        assert_eq!(err.to_string(), "Database error: insert failed: disk full");
    }
}
