//! Reference data request payloads
//!
//! Warehouses, units and currencies only carry a name and an active flag, so
//! they share [`NamedCreateRequest`] / [`NamedUpdateRequest`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NamedCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NamedUpdateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplierCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplierUpdateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryUpdateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub active: bool,
    pub parent_id: Option<Uuid>,
}

/// New product. `current_sale_price` defaults to zero, which makes the
/// product unsellable without an explicit price until its first stock-in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category_id: Uuid,
    pub unit_id: Uuid,
    pub supplier_id: Uuid,
    pub current_sale_price: Option<Decimal>,
}

/// Product update. A missing `current_sale_price` keeps the stored price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category_id: Uuid,
    pub unit_id: Uuid,
    pub supplier_id: Uuid,
    pub active: bool,
    pub current_sale_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        let req = NamedCreateRequest { name: String::new() };
        assert!(req.validate().is_err());

        let req = NamedCreateRequest { name: "Main warehouse".into() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn supplier_phone_length_is_checked() {
        let req = SupplierCreateRequest {
            name: "Acme".into(),
            phone: "1".into(),
        };
        assert!(req.validate().is_err());
    }
}
