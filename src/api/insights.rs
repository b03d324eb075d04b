use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::{
    ApiError, AppState, CompareQuery, ComparisonResponse, GenerateInsightResponse,
    ModelsResponse, ProductInsightsResponse,
};
use crate::api::validation::parse_aspects;
use crate::models::{InsightRequest, Metadata};
use crate::services::insight_service::insight_product_key;

pub async fn generate_insight(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<GenerateInsightResponse>, ApiError> {
    let insight = state
        .insight_service()
        .generate_for_request(&request)
        .await
        .map_err(|e| ApiError::from(e).during("Error generating insight"))?;

    Ok(Json(GenerateInsightResponse {
        success: true,
        insight,
        product_id: request.product_id.as_deref().map(insight_product_key),
    }))
}

pub async fn get_product_insights(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductInsightsResponse>, ApiError> {
    let insights = state
        .insight_service()
        .list_for_product(&product_id)
        .await
        .map_err(|e| ApiError::from(e).during("Error fetching insights"))?;

    Ok(Json(ProductInsightsResponse {
        success: true,
        product_id: insight_product_key(&product_id),
        count: insights.len(),
        insights,
    }))
}

pub async fn compare_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
    Json(products): Json<Vec<Metadata>>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let aspects = parse_aspects(query.aspects.as_deref());

    let comparison = state
        .insight_service()
        .compare_products(&products, &aspects)
        .await
        .map_err(|e| ApiError::from(e).during("Error comparing products"))?;

    Ok(Json(ComparisonResponse {
        success: true,
        comparison,
        products_count: products.len(),
    }))
}

pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let service = state.insight_service();
    let models = service
        .list_available_models()
        .await
        .map_err(|e| ApiError::from(e).during("Error fetching models"))?;

    Ok(Json(ModelsResponse {
        success: true,
        models,
        current_model: service.current_model(),
    }))
}
