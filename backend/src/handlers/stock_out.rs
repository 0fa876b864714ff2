//! HTTP handlers for sales

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{ApiResponse, StockOutRequest};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock_out::{StockOutResult, StockOutService};
use crate::AppState;

/// Record a sale
pub async fn record_stock_out(
    State(state): State<AppState>,
    Json(input): Json<StockOutRequest>,
) -> AppResult<Json<ApiResponse<StockOutResult>>> {
    let service = StockOutService::new(state.db, state.recorder);
    let sale = service.record(input).await?;
    Ok(Json(ApiResponse::with_message("Sale recorded", sale)))
}

/// Get a sale with its lines
pub async fn get_stock_out(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StockOutResult>>> {
    let service = StockOutService::new(state.db, state.recorder);
    let sale = service.get(id).await?;
    Ok(Json(ApiResponse::ok(sale)))
}
