//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response envelope returned by every successful API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

/// Kinds of records that can be referenced by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Warehouse,
    Category,
    Unit,
    Currency,
    Supplier,
    Product,
    StockIn,
    StockOut,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Warehouse => "Warehouse",
            ReferenceKind::Category => "Category",
            ReferenceKind::Unit => "Unit",
            ReferenceKind::Currency => "Currency",
            ReferenceKind::Supplier => "Supplier",
            ReferenceKind::Product => "Product",
            ReferenceKind::StockIn => "Stock entry",
            ReferenceKind::StockOut => "Sale",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
