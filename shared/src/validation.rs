//! Request validation for stock transactions and settings
//!
//! These checks run before any reference is resolved, so a malformed request
//! never touches the database.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{StockInRequest, StockOutRequest};

/// A rejected field with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// Fractional digits a stored quantity or price can hold
pub const MAX_SCALE: u32 = 4;

/// Integer digits a stored quantity or price can hold (NUMERIC(19, 4))
const MAX_INTEGER_DIGITS: u32 = 15;

/// Rejects values the storage columns would round or overflow
fn validate_storable(field: &str, value: Decimal) -> ValidationResult {
    if value.normalize().scale() > MAX_SCALE {
        return Err(ValidationError::new(
            field,
            format!("At most {MAX_SCALE} decimal places are allowed"),
        ));
    }
    if value.abs() >= Decimal::from(10i64.pow(MAX_INTEGER_DIGITS)) {
        return Err(ValidationError::new(field, "Value is too large"));
    }
    Ok(())
}

pub fn validate_positive_quantity(field: &str, quantity: Decimal) -> ValidationResult {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::new(field, "Quantity must be positive"));
    }
    validate_storable(field, quantity)
}

pub fn validate_non_negative_price(field: &str, price: Decimal) -> ValidationResult {
    if price < Decimal::ZERO {
        return Err(ValidationError::new(field, "Price cannot be negative"));
    }
    validate_storable(field, price)
}

pub fn validate_invoice_number(invoice_number: &str) -> ValidationResult {
    let trimmed = invoice_number.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("invoice_number", "Invoice number is required"));
    }
    if trimmed.len() > 100 {
        return Err(ValidationError::new(
            "invoice_number",
            "Invoice number must be at most 100 characters",
        ));
    }
    Ok(())
}

pub fn validate_stock_in(request: &StockInRequest) -> ValidationResult {
    validate_invoice_number(&request.invoice_number)?;
    if request.items.is_empty() {
        return Err(ValidationError::new("items", "At least one item is required"));
    }
    for (idx, item) in request.items.iter().enumerate() {
        validate_positive_quantity(&format!("items[{idx}].quantity"), item.quantity)?;
        validate_non_negative_price(&format!("items[{idx}].purchase_price"), item.purchase_price)?;
        validate_non_negative_price(&format!("items[{idx}].sale_price"), item.sale_price)?;
    }
    Ok(())
}

pub fn validate_stock_out(request: &StockOutRequest) -> ValidationResult {
    validate_invoice_number(&request.invoice_number)?;
    if request.items.is_empty() {
        return Err(ValidationError::new("items", "At least one item is required"));
    }
    for (idx, item) in request.items.iter().enumerate() {
        validate_positive_quantity(&format!("items[{idx}].quantity"), item.quantity)?;
        if let Some(price) = item.price {
            validate_non_negative_price(&format!("items[{idx}].price"), price)?;
        }
    }
    Ok(())
}

pub fn validate_horizon_days(days_before: i64) -> ValidationResult {
    if days_before < 0 {
        return Err(ValidationError::new("days_before", "Days before expiry cannot be negative"));
    }
    if days_before > 3650 {
        return Err(ValidationError::new("days_before", "Days before expiry is too large"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StockInLineInput, StockOutLineInput};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn stock_in(items: Vec<StockInLineInput>) -> StockInRequest {
        StockInRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            warehouse_id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            invoice_number: "INV-1".into(),
            items,
        }
    }

    fn in_line(quantity: i64, purchase: i64, sale: i64) -> StockInLineInput {
        StockInLineInput {
            product_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            quantity: Decimal::from(quantity),
            purchase_price: Decimal::from(purchase),
            sale_price: Decimal::from(sale),
            expiry_date: None,
            currency_id: Uuid::new_v4(),
        }
    }

    fn out_line(quantity: i64, price: Option<i64>) -> StockOutLineInput {
        StockOutLineInput {
            product_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            quantity: Decimal::from(quantity),
            price: price.map(Decimal::from),
            currency_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn empty_stock_in_is_rejected() {
        let err = validate_stock_in(&stock_in(vec![])).unwrap_err();
        assert_eq!(err.field, "items");
    }

    #[test]
    fn stock_in_quantity_must_be_positive() {
        let err = validate_stock_in(&stock_in(vec![in_line(5, 1, 2), in_line(0, 1, 2)])).unwrap_err();
        assert_eq!(err.field, "items[1].quantity");
    }

    #[test]
    fn stock_in_negative_price_is_rejected() {
        let err = validate_stock_in(&stock_in(vec![in_line(1, -1, 2)])).unwrap_err();
        assert_eq!(err.field, "items[0].purchase_price");
    }

    #[test]
    fn zero_sale_price_is_allowed_on_stock_in() {
        assert!(validate_stock_in(&stock_in(vec![in_line(1, 0, 0)])).is_ok());
    }

    #[test]
    fn blank_invoice_is_rejected() {
        let mut req = stock_in(vec![in_line(1, 1, 1)]);
        req.invoice_number = "   ".into();
        assert_eq!(validate_stock_in(&req).unwrap_err().field, "invoice_number");
    }

    #[test]
    fn stock_out_checks_lines() {
        let req = StockOutRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            warehouse_id: Uuid::new_v4(),
            invoice_number: "S-1".into(),
            items: vec![out_line(2, None), out_line(-3, Some(4))],
        };
        assert_eq!(validate_stock_out(&req).unwrap_err().field, "items[1].quantity");

        let req = StockOutRequest {
            items: vec![out_line(2, Some(-1))],
            ..req
        };
        assert_eq!(validate_stock_out(&req).unwrap_err().field, "items[0].price");
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn sub_storage_quantity_is_rejected() {
        let mut line = in_line(1, 1, 1);
        line.quantity = dec("0.00001");
        let err = validate_stock_in(&stock_in(vec![line])).unwrap_err();
        assert_eq!(err.field, "items[0].quantity");
        assert!(err.message.contains("decimal places"));
    }

    #[test]
    fn quantities_that_would_round_are_rejected() {
        let mut line = in_line(1, 1, 1);
        line.quantity = dec("2.00005");
        assert_eq!(
            validate_stock_in(&stock_in(vec![line])).unwrap_err().field,
            "items[0].quantity"
        );

        let mut line = in_line(1, 1, 1);
        line.sale_price = dec("5.123456");
        assert_eq!(
            validate_stock_in(&stock_in(vec![line])).unwrap_err().field,
            "items[0].sale_price"
        );
    }

    #[test]
    fn four_decimal_places_fit() {
        let mut line = in_line(1, 1, 1);
        line.quantity = dec("2.0001");
        line.sale_price = dec("5.1235");
        assert!(validate_stock_in(&stock_in(vec![line])).is_ok());
    }

    #[test]
    fn trailing_zeros_do_not_count_as_scale() {
        assert!(validate_positive_quantity("quantity", dec("1.500000")).is_ok());
    }

    #[test]
    fn oversized_values_are_rejected() {
        let err = validate_non_negative_price("price", dec("1000000000000000")).unwrap_err();
        assert_eq!(err.message, "Value is too large");
        assert!(validate_non_negative_price("price", dec("999999999999999.9999")).is_ok());
    }

    #[test]
    fn explicit_sale_price_must_be_storable() {
        let mut line = out_line(1, None);
        line.price = Some(dec("0.00001"));
        let req = StockOutRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            warehouse_id: Uuid::new_v4(),
            invoice_number: "S-2".into(),
            items: vec![out_line(1, Some(3)), line],
        };
        assert_eq!(validate_stock_out(&req).unwrap_err().field, "items[1].price");
    }

    #[test]
    fn horizon_bounds() {
        assert!(validate_horizon_days(0).is_ok());
        assert!(validate_horizon_days(30).is_ok());
        assert!(validate_horizon_days(-1).is_err());
    }
}
