//! Sale price rules shared by the stock-in and stock-out pipelines

use rust_decimal::Decimal;
use uuid::Uuid;

/// New `current_sale_price` per product touched by one stock-in.
///
/// Takes `(product_id, sale_price)` pairs in line order. Each product appears
/// once in the result, in first-seen order, carrying the sale price of its
/// last line.
pub fn last_sale_prices<I>(lines: I) -> Vec<(Uuid, Decimal)>
where
    I: IntoIterator<Item = (Uuid, Decimal)>,
{
    let mut prices: Vec<(Uuid, Decimal)> = Vec::new();
    for (product_id, sale_price) in lines {
        match prices.iter_mut().find(|(id, _)| *id == product_id) {
            Some(entry) => entry.1 = sale_price,
            None => prices.push((product_id, sale_price)),
        }
    }
    prices
}

/// Price a stock-out line sells at: the explicit price when given, otherwise
/// the product's current sale price. `None` when the result is not positive.
pub fn effective_sale_price(explicit: Option<Decimal>, current_sale_price: Decimal) -> Option<Decimal> {
    let price = explicit.unwrap_or(current_sale_price);
    (price > Decimal::ZERO).then_some(price)
}
