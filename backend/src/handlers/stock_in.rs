//! HTTP handlers for stock entries

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{ApiResponse, StockInRequest};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock_in::{StockInResult, StockInService};
use crate::AppState;

/// Record a stock entry
pub async fn record_stock_in(
    State(state): State<AppState>,
    Json(input): Json<StockInRequest>,
) -> AppResult<Json<ApiResponse<StockInResult>>> {
    let service = StockInService::new(state.db, state.recorder);
    let entry = service.record(input).await?;
    Ok(Json(ApiResponse::with_message("Stock entry recorded", entry)))
}

/// Get a stock entry with its lines
pub async fn get_stock_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StockInResult>>> {
    let service = StockInService::new(state.db, state.recorder);
    let entry = service.get(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}
