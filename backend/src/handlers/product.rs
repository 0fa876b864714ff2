//! HTTP handlers for products

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{ApiResponse, ProductCreateRequest, ProductUpdateRequest};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::product::{Product, ProductService};
use crate::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductCreateRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let service = ProductService::new(state.db, state.recorder);
    let product = service.create(input).await?;
    Ok(Json(ApiResponse::with_message("Product created", product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductUpdateRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let service = ProductService::new(state.db, state.recorder);
    let product = service.update(id, input).await?;
    Ok(Json(ApiResponse::with_message("Product updated", product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let service = ProductService::new(state.db, state.recorder);
    Ok(Json(ApiResponse::ok(service.get(id).await?)))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let service = ProductService::new(state.db, state.recorder);
    Ok(Json(ApiResponse::ok(service.list_active().await?)))
}
