//! HTTP handlers for the notification settings

use axum::{extract::State, Json};
use shared::{ApiResponse, NotificationPolicy, NotificationPolicyUpdate};

use crate::error::AppResult;
use crate::services::NotificationPolicyService;
use crate::AppState;

pub async fn get_notification_policy(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<NotificationPolicy>>> {
    let service = NotificationPolicyService::new(state.db);
    let policy = service.get_or_init().await?;
    Ok(Json(ApiResponse::ok(policy)))
}

pub async fn update_notification_policy(
    State(state): State<AppState>,
    Json(input): Json<NotificationPolicyUpdate>,
) -> AppResult<Json<ApiResponse<NotificationPolicy>>> {
    let service = NotificationPolicyService::new(state.db);
    let policy = service.update(input).await?;
    Ok(Json(ApiResponse::with_message("Notification settings updated", policy)))
}
