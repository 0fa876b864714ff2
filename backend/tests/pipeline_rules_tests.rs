//! Transaction pipeline rule tests
//!
//! Properties of the pieces the stock-in / stock-out pipelines and the
//! scheduler are assembled from:
//! - Ledger rows are touched in ascending product order
//! - A priceless line on an unpriced product blocks the whole sale
//! - The scheduler always fires within the next 24 hours

use chrono::{Duration, NaiveDate, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::pricing::{effective_sale_price, last_sale_prices};
use shared::{check_decrease, Shortfall};
use uuid::Uuid;
use warehouse_backend::services::expiry::next_run_after;
use warehouse_backend::services::recorder::ledger_order;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Lines [(A, 10), (A, 15)] leave A priced at 15
    #[test]
    fn test_last_line_price_wins() {
        let a = Uuid::new_v4();
        let prices = last_sale_prices([(a, Decimal::from(10)), (a, Decimal::from(15))]);
        assert_eq!(prices, vec![(a, Decimal::from(15))]);
    }

    /// One unpriced line means the sale cannot be priced at all
    #[test]
    fn test_unpriced_line_blocks_sale() {
        let lines = [
            (None, Decimal::from(4)),
            (Some(Decimal::from(2)), Decimal::ZERO),
            (None, Decimal::ZERO),
        ];

        let priced: Option<Vec<Decimal>> = lines
            .iter()
            .map(|(explicit, current)| effective_sale_price(*explicit, *current))
            .collect();

        assert!(priced.is_none());
    }

    /// Stock-out above balance is refused with the full shortfall
    #[test]
    fn test_oversell_reports_shortfall() {
        let err = check_decrease(Some(Decimal::from(5)), Decimal::from(8)).unwrap_err();

        assert_eq!(
            err,
            Shortfall::Insufficient {
                available: Decimal::from(5),
                requested: Decimal::from(8)
            }
        );
        assert_eq!(err.missing(), Some(Decimal::from(3)));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ledger_order_is_sorted_permutation(ids in prop::collection::vec(0u128..8, 0..20)) {
        let products: Vec<Uuid> = ids.into_iter().map(Uuid::from_u128).collect();
        let order = ledger_order(&products);

        let mut seen = order.clone();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..products.len()).collect::<Vec<_>>());

        for pair in order.windows(2) {
            prop_assert!(products[pair[0]] <= products[pair[1]]);
            if products[pair[0]] == products[pair[1]] {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn prop_next_run_is_within_a_day(
        day in 0i64..3650,
        secs in 0u32..86_400,
        at_secs in 0u32..86_400,
    ) {
        let now = (NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(day))
            .and_time(NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap());
        let at = NaiveTime::from_num_seconds_from_midnight_opt(at_secs, 0).unwrap();

        let next = next_run_after(now, at);

        prop_assert!(next > now);
        prop_assert!(next - now <= Duration::days(1));
        prop_assert_eq!(next.time(), at);
    }
}
