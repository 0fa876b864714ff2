//! HTTP handlers for stock balances

use axum::{
    extract::{Path, State},
    Json,
};
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::{LedgerService, StockBalanceView};
use crate::AppState;

pub async fn warehouse_stock(
    State(state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<StockBalanceView>>>> {
    let balances = LedgerService::new(state.db)
        .list_by_warehouse(warehouse_id)
        .await?;
    Ok(Json(ApiResponse::ok(balances)))
}

pub async fn product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<StockBalanceView>>>> {
    let balances = LedgerService::new(state.db)
        .list_by_product(product_id)
        .await?;
    Ok(Json(ApiResponse::ok(balances)))
}
