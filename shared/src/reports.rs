//! Daily dashboard aggregation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One transaction line as read for a daily report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_name: String,
    pub currency_id: Uuid,
    pub currency_name: String,
    pub quantity: Decimal,
    /// Purchase price for stock-in lines, sale price for stock-out lines
    pub unit_price: Decimal,
}

/// Totals for one (product, currency) pair on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProductTotal {
    pub product_id: Uuid,
    pub product_name: String,
    pub total_quantity: Decimal,
    pub unit_name: String,
    pub total_amount: Decimal,
    pub currency_id: Uuid,
    pub currency_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub items: Vec<DailyProductTotal>,
}

/// Group lines per (product, currency), summing quantity and
/// quantity × unit price. Groups keep first-seen order and take their unit
/// name from the first line of the group.
pub fn summarize_lines<I>(lines: I) -> Vec<DailyProductTotal>
where
    I: IntoIterator<Item = ReportLine>,
{
    let mut totals: Vec<DailyProductTotal> = Vec::new();
    for line in lines {
        let amount = line.quantity * line.unit_price;
        match totals
            .iter_mut()
            .find(|t| t.product_id == line.product_id && t.currency_id == line.currency_id)
        {
            Some(total) => {
                total.total_quantity += line.quantity;
                total.total_amount += amount;
            }
            None => totals.push(DailyProductTotal {
                product_id: line.product_id,
                product_name: line.product_name,
                total_quantity: line.quantity,
                unit_name: line.unit_name,
                total_amount: amount,
                currency_id: line.currency_id,
                currency_name: line.currency_name,
            }),
        }
    }
    totals
}

/// Order totals by amount, highest first. Equal amounts keep their order.
pub fn rank_by_amount(mut totals: Vec<DailyProductTotal>) -> Vec<DailyProductTotal> {
    totals.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    totals
}
