use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::{ApiError, AppState, DeleteResponse, ListProductsQuery};
use crate::api::validation::{non_blank, validate_limit, validate_product_id};
use crate::models::{NewProduct, Product, ProductFilter, ProductPatch};

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .product_service()
        .create_product(payload)
        .await
        .map_err(|e| ApiError::from(e).during("Error creating product"))?;

    Ok(Json(product))
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let limit = validate_limit(query.limit)?;
    let filter = ProductFilter {
        marketplace: non_blank(query.marketplace),
        category: non_blank(query.category),
    };

    let products = state
        .product_service()
        .list_products(query.skip, limit, filter)
        .await
        .map_err(|e| ApiError::from(e).during("Error fetching products"))?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = validate_product_id(&id)?;
    let product = state.product_service().get_product(id).await?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    let id = validate_product_id(&id)?;
    let product = state.product_service().update_product(id, patch).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = validate_product_id(&id)?;
    state.product_service().delete_product(id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
    }))
}
