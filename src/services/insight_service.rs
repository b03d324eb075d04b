//! Domain service for model-generated insights.

use crate::clients::OllamaError;
use crate::domain::{InvalidIdentifier, ProductId};
use crate::models::{GeneratedInsight, Insight, InsightRequest, Metadata};
use crate::services::prompts::ProductContext;
use thiserror::Error;

pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error("Error calling Ollama API: {0}")]
    Backend(#[from] OllamaError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for InsightError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Generation, comparison and retrieval of insights.
///
/// Nothing is retried. A backend failure surfaces as [`InsightError::Backend`]
/// and nothing is persisted.
#[async_trait::async_trait]
pub trait InsightService: Send + Sync {
    /// Builds the prompt for `insight_type` and runs one model call.
    ///
    /// Unknown types use the general template but keep their original label.
    async fn generate_product_insight(
        &self,
        product: ProductContext<'_>,
        insight_type: &str,
    ) -> Result<GeneratedInsight, InsightError>;

    /// Resolves the referenced product, generates, and stores the result when
    /// the request names a product.
    ///
    /// # Errors
    ///
    /// - Returns [`InsightError::InvalidIdentifier`] for a malformed `product_id`
    /// - Returns [`InsightError::ProductNotFound`] if `product_id` matches nothing
    /// - Returns [`InsightError::Backend`] if the model call fails
    async fn generate_for_request(
        &self,
        request: &InsightRequest,
    ) -> Result<GeneratedInsight, InsightError>;

    /// # Errors
    ///
    /// Returns [`InsightError::Validation`] for fewer than two products.
    async fn compare_products(
        &self,
        products: &[Metadata],
        aspects: &[String],
    ) -> Result<String, InsightError>;

    async fn list_available_models(&self) -> Result<Vec<String>, InsightError>;

    /// Stored insights for `product_id`, newest first.
    ///
    /// A well-formed product id is looked up in canonical form; any other text
    /// is matched as given.
    async fn list_for_product(&self, product_id: &str) -> Result<Vec<Insight>, InsightError>;

    /// Model name used for every generation.
    fn current_model(&self) -> String;
}

/// `product_name` from the request, then the stored name, then a placeholder.
#[must_use]
pub fn resolve_product_name<'a>(requested: Option<&'a str>, stored: Option<&'a str>) -> &'a str {
    requested
        .filter(|name| !name.trim().is_empty())
        .or(stored)
        .unwrap_or(UNKNOWN_PRODUCT_NAME)
}

/// Key insights are stored under: the canonical id when `raw` parses as a
/// [`ProductId`], otherwise `raw` unchanged.
#[must_use]
pub fn insight_product_key(raw: &str) -> String {
    ProductId::parse(raw).map_or_else(|_| raw.to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name_resolution_order() {
        assert_eq!(resolve_product_name(Some("Gadget"), Some("Widget")), "Gadget");
        assert_eq!(resolve_product_name(None, Some("Widget")), "Widget");
        assert_eq!(resolve_product_name(Some(""), Some("Widget")), "Widget");
        assert_eq!(resolve_product_name(None, None), UNKNOWN_PRODUCT_NAME);
    }

    #[test]
    fn invalid_identifier_message_is_kept() {
        let err: InsightError = InvalidIdentifier("abc".to_string()).into();
        assert_eq!(err.to_string(), "Invalid product identifier: 'abc'");
    }

    #[test]
    fn insight_product_key_canonicalizes_ids() {
        let id = ProductId::generate();
        let upper = id.to_string().to_uppercase();
        assert_eq!(insight_product_key(&upper), id.to_string());
        assert_eq!(insight_product_key(&format!(" {id}\t")), id.to_string());
        assert_eq!(insight_product_key("p-1"), "p-1");
    }
}
