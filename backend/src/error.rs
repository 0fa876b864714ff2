//! Error handling for the warehouse backend
//!
//! Client errors carry enough detail to fix the request; server errors are
//! logged in full and answered with an opaque message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{ReferenceKind, ValidationError};
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("{kind} not found with id={id}")]
    NotFound { kind: ReferenceKind, id: Uuid },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    // Business rule violations
    #[error(
        "Not enough stock for product={product_id} in warehouse={warehouse_id}: \
         available {available}, requested {requested}, short by {missing}"
    )]
    InsufficientStock {
        product_id: Uuid,
        warehouse_id: Uuid,
        available: Decimal,
        requested: Decimal,
        missing: Decimal,
    },

    #[error("No stock for product={product_id} in warehouse={warehouse_id}")]
    OutOfStock { product_id: Uuid, warehouse_id: Uuid },

    #[error("Sale price is not set for product={product_id}")]
    PriceNotSet { product_id: Uuid },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(kind: ReferenceKind, id: Uuid) -> Self {
        AppError::NotFound { kind, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_)
        )
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        let detail = |code: &str, message: String| ErrorDetail {
            code: code.to_string(),
            message,
            field: None,
        };

        match self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, detail("NOT_FOUND", self.to_string())),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::InsufficientStock { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                detail("INSUFFICIENT_STOCK", self.to_string()),
            ),
            AppError::OutOfStock { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                detail("OUT_OF_STOCK", self.to_string()),
            ),
            AppError::PriceNotSet { product_id } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                detail(
                    "PRICE_NOT_SET",
                    format!(
                        "Sale price is not set for product={}. Provide item.price or set the \
                         product's current sale price via a stock entry.",
                        product_id
                    ),
                ),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail("DATABASE_ERROR", "A database error occurred".to_string()),
            ),
            AppError::Internal(_) | AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail("INTERNAL_ERROR", "An internal server error occurred".to_string()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: error_detail,
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
