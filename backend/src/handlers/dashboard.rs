//! HTTP handlers for the dashboard reports

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use shared::reports::DailyReport;
use shared::ApiResponse;

use crate::error::AppResult;
use crate::services::expiry::ExpiringProductView;
use crate::services::{StockInService, StockOutService};
use crate::AppState;

/// `?date=YYYY-MM-DD`, defaulting to today
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

impl DateQuery {
    fn date_or_today(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

/// Stock received on a day, per product and currency
pub async fn daily_stock_in_summary(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ApiResponse<DailyReport>>> {
    let service = StockInService::new(state.db, state.recorder);
    let report = service.daily_summary(query.date_or_today()).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// Sales of a day, highest amount first
pub async fn daily_top_sales(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ApiResponse<DailyReport>>> {
    let service = StockOutService::new(state.db, state.recorder);
    let report = service.daily_top_sales(query.date_or_today()).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// Batches expiring from today within `days` (or the policy horizon)
pub async fn expiring_products(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> AppResult<Json<ApiResponse<Vec<ExpiringProductView>>>> {
    let today = Local::now().date_naive();
    let items = state.scanner.expiring_products(today, query.days).await?;
    Ok(Json(ApiResponse::ok(items)))
}
