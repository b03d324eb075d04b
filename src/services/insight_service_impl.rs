//! [`InsightService`] backed by the Ollama client and the SQLite store.

use crate::clients::OllamaClient;
use crate::db::Store;
use crate::domain::{InsightType, ProductId};
use crate::models::{GeneratedInsight, Insight, InsightMetadata, InsightRequest, Metadata};
use crate::services::insight_service::{
    InsightError, InsightService, insight_product_key, resolve_product_name,
};
use crate::services::prompts::{
    self, COMPARISON_SYSTEM_PROMPT, INSIGHT_SYSTEM_PROMPT, ProductContext,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct OllamaInsightService {
    store: Arc<Store>,
    client: Arc<OllamaClient>,
}

impl OllamaInsightService {
    #[must_use]
    pub const fn new(store: Arc<Store>, client: Arc<OllamaClient>) -> Self {
        Self { store, client }
    }
}

#[async_trait::async_trait]
impl InsightService for OllamaInsightService {
    async fn generate_product_insight(
        &self,
        product: ProductContext<'_>,
        insight_type: &str,
    ) -> Result<GeneratedInsight, InsightError> {
        let template = prompts::select_template(InsightType::from_label(insight_type));
        let prompt = prompts::render_insight_prompt(&template, &prompts::build_context(&product));

        let content = self
            .client
            .chat(&prompt, Some(INSIGHT_SYSTEM_PROMPT))
            .await?;

        Ok(GeneratedInsight {
            insight_type: insight_type.to_string(),
            insight_content: content,
            product_name: product.name.to_string(),
            metadata: InsightMetadata {
                model_used: self.client.model().to_string(),
                category: product.category.map(str::to_string),
                price: product.price,
                marketplace: product.marketplace.map(str::to_string),
            },
        })
    }

    #[instrument(skip(self, request), fields(insight_type = %request.insight_type))]
    async fn generate_for_request(
        &self,
        request: &InsightRequest,
    ) -> Result<GeneratedInsight, InsightError> {
        let product_id = request
            .product_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(ProductId::parse)
            .transpose()?;

        let product = match product_id {
            Some(id) => Some(
                self.store
                    .get_product(id)
                    .await?
                    .ok_or(InsightError::ProductNotFound)?,
            ),
            None => None,
        };

        let context = ProductContext {
            name: resolve_product_name(
                request.product_name.as_deref(),
                product.as_ref().map(|p| p.name.as_str()),
            ),
            description: product.as_ref().and_then(|p| p.description.as_deref()),
            category: product.as_ref().and_then(|p| p.category.as_deref()),
            price: product.as_ref().and_then(|p| p.price),
            marketplace: product.as_ref().map(|p| p.marketplace.as_str()),
            additional_context: request.context.as_deref(),
        };

        let generated = self
            .generate_product_insight(context, &request.insight_type)
            .await?;

        if let Some(id) = product_id {
            let stored = self
                .store
                .save_insight(generated.clone().into_new_insight(id.to_string(), Utc::now()))
                .await?;
            info!(insight_id = %stored.id, product_id = %id, "Insight generated and stored");
        }

        Ok(generated)
    }

    async fn compare_products(
        &self,
        products: &[Metadata],
        aspects: &[String],
    ) -> Result<String, InsightError> {
        if products.len() < 2 {
            return Err(InsightError::Validation(
                "At least 2 products required for comparison".to_string(),
            ));
        }

        let prompt = prompts::render_comparison_prompt(products, aspects);
        Ok(self
            .client
            .chat(&prompt, Some(COMPARISON_SYSTEM_PROMPT))
            .await?)
    }

    async fn list_available_models(&self) -> Result<Vec<String>, InsightError> {
        Ok(self.client.list_models().await?)
    }

    async fn list_for_product(&self, product_id: &str) -> Result<Vec<Insight>, InsightError> {
        Ok(self
            .store
            .list_insights_for_product(&insight_product_key(product_id))
            .await?)
    }

    fn current_model(&self) -> String {
        self.client.model().to_string()
    }
}
