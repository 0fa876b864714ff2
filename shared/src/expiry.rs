//! Expiry window and alert message composition

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive date range `[from, to]` a batch must expire in to be alerted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ExpiryWindow {
    pub fn starting(today: NaiveDate, horizon_days: i64) -> Self {
        Self {
            from: today,
            to: today + Duration::days(horizon_days.max(0)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Whole days between `today` and `expiry_date`
pub fn days_remaining(today: NaiveDate, expiry_date: NaiveDate) -> i64 {
    (expiry_date - today).num_days()
}

/// A stock-in line with an expiry date, joined with its display names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringBatch {
    /// The originating stock-in line; identifies the batch
    pub stock_in_line_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub quantity: Decimal,
    pub unit_name: String,
    pub expiry_date: NaiveDate,
}

impl ExpiringBatch {
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        days_remaining(today, self.expiry_date)
    }

    /// Text sent to the alert channel
    pub fn alert_message(&self, today: NaiveDate) -> String {
        format!(
            "⚠️ Expiry date approaching!\n\n\
             Product: {}\n\
             Warehouse: {}\n\
             Quantity: {} {}\n\
             Expiry date: {}\n\
             Days left: {}\n",
            self.product_name,
            self.warehouse_name,
            self.quantity.normalize(),
            self.unit_name,
            self.expiry_date,
            self.days_left(today),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn batch(expiry_date: NaiveDate) -> ExpiringBatch {
        ExpiringBatch {
            stock_in_line_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Milk 1L".into(),
            warehouse_id: Uuid::new_v4(),
            warehouse_name: "North".into(),
            quantity: Decimal::new(1250, 2),
            unit_name: "box".into(),
            expiry_date,
        }
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let window = ExpiryWindow::starting(date(2024, 2, 26), 7);
        assert_eq!(window.to, date(2024, 3, 4));
        assert!(window.contains(date(2024, 2, 26)));
        assert!(window.contains(date(2024, 3, 4)));
        assert!(!window.contains(date(2024, 3, 5)));
        assert!(!window.contains(date(2024, 2, 25)));
    }

    #[test]
    fn zero_horizon_covers_today_only() {
        let today = date(2024, 1, 1);
        let window = ExpiryWindow::starting(today, 0);
        assert_eq!(window.from, window.to);
    }

    #[test]
    fn days_left_counts_whole_days() {
        assert_eq!(days_remaining(date(2024, 1, 30), date(2024, 2, 2)), 3);
        assert_eq!(days_remaining(date(2024, 1, 30), date(2024, 1, 30)), 0);
    }

    #[test]
    fn message_lists_batch_details() {
        let today = date(2024, 6, 1);
        let msg = batch(date(2024, 6, 4)).alert_message(today);

        assert!(msg.contains("Product: Milk 1L"));
        assert!(msg.contains("Warehouse: North"));
        assert!(msg.contains("Quantity: 12.5 box"));
        assert!(msg.contains("Expiry date: 2024-06-04"));
        assert!(msg.contains("Days left: 3"));
    }
}
