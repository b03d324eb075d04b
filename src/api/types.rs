use serde::{Deserialize, Serialize};

use crate::models::{GeneratedInsight, Insight};

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub marketplace: Option<String>,
    pub category: Option<String>,
}

const fn default_limit() -> u64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated list, e.g. `price,durability`.
    pub aspects: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateInsightResponse {
    pub success: bool,
    pub insight: GeneratedInsight,
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductInsightsResponse {
    pub success: bool,
    pub product_id: String,
    pub insights: Vec<Insight>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub success: bool,
    pub comparison: String,
    pub products_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub success: bool,
    pub models: Vec<String>,
    pub current_model: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
