//! Stock transaction payloads and the quantity ledger arithmetic

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a stock-in request. A line with an expiry date is tracked as
/// its own batch by the expiry scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInLineInput {
    pub product_id: Uuid,
    pub unit_id: Uuid,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub currency_id: Uuid,
}

/// Incoming stock from a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInRequest {
    pub date: NaiveDate,
    pub warehouse_id: Uuid,
    pub supplier_id: Uuid,
    pub invoice_number: String,
    pub items: Vec<StockInLineInput>,
}

/// One line of a stock-out request. Without `price` the product's current
/// sale price is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOutLineInput {
    pub product_id: Uuid,
    pub unit_id: Uuid,
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub currency_id: Uuid,
}

/// Outgoing stock to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOutRequest {
    pub date: NaiveDate,
    pub warehouse_id: Uuid,
    pub invoice_number: String,
    pub items: Vec<StockOutLineInput>,
}

/// Why a decrease could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// No ledger row exists for the pair
    OutOfStock,
    Insufficient { available: Decimal, requested: Decimal },
}

impl Shortfall {
    /// Quantity missing to satisfy the request
    pub fn missing(&self) -> Option<Decimal> {
        match self {
            Shortfall::OutOfStock => None,
            Shortfall::Insufficient {
                available,
                requested,
            } => Some(*requested - *available),
        }
    }
}

/// Quantity left after taking `requested` from `current`, where `None` means
/// the ledger row does not exist yet.
pub fn check_decrease(current: Option<Decimal>, requested: Decimal) -> Result<Decimal, Shortfall> {
    match current {
        None => Err(Shortfall::OutOfStock),
        Some(available) if available < requested => Err(Shortfall::Insufficient {
            available,
            requested,
        }),
        Some(available) => Ok(available - requested),
    }
}
