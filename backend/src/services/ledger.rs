//! Quantity ledger: one on-hand quantity per (warehouse, product)
//!
//! `increase` and `decrease` run on the caller's open transaction so they
//! commit or roll back together with the transaction lines that caused them.
//! Both are single atomic statements; concurrent decreases on the same row
//! serialize on its row lock and the `quantity >= $n` guard keeps the balance
//! non-negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{check_decrease, Shortfall};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Attempts of the conditional update when a concurrent stock-in lands
/// between a failed update and the follow-up read
const MAX_DECREASE_ATTEMPTS: usize = 3;

/// Ledger row with display names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockBalanceView {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Add `quantity` to the (warehouse, product) row, creating it on first use
pub async fn increase(
    conn: &mut PgConnection,
    warehouse_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
) -> AppResult<Decimal> {
    let balance = sqlx::query_scalar::<_, Decimal>(
        r#"
        INSERT INTO stock_balances (warehouse_id, product_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (warehouse_id, product_id)
        DO UPDATE SET quantity = stock_balances.quantity + EXCLUDED.quantity,
                      updated_at = NOW()
        RETURNING quantity
        "#,
    )
    .bind(warehouse_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!(%warehouse_id, %product_id, %quantity, %balance, "Stock increased");
    Ok(balance)
}

/// Take `quantity` from the (warehouse, product) row.
///
/// Fails with `OutOfStock` when the row does not exist and with
/// `InsufficientStock` when it holds less than requested; the row is left
/// untouched in both cases.
pub async fn decrease(
    conn: &mut PgConnection,
    warehouse_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
) -> AppResult<Decimal> {
    for _ in 0..MAX_DECREASE_ATTEMPTS {
        let updated = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE stock_balances
            SET quantity = quantity - $3, updated_at = NOW()
            WHERE warehouse_id = $1 AND product_id = $2 AND quantity >= $3
            RETURNING quantity
            "#,
        )
        .bind(warehouse_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(balance) = updated {
            tracing::debug!(%warehouse_id, %product_id, %quantity, %balance, "Stock decreased");
            return Ok(balance);
        }

        let current = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity FROM stock_balances WHERE warehouse_id = $1 AND product_id = $2",
        )
        .bind(warehouse_id)
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

        match check_decrease(current, quantity) {
            Err(shortfall) => return Err(shortfall_error(shortfall, warehouse_id, product_id)),
            // Replenished between the two statements
            Ok(_) => continue,
        }
    }

    Err(AppError::Internal(format!(
        "stock decrease for product={product_id} in warehouse={warehouse_id} kept racing"
    )))
}

fn shortfall_error(shortfall: Shortfall, warehouse_id: Uuid, product_id: Uuid) -> AppError {
    let missing = shortfall.missing();
    match (shortfall, missing) {
        (Shortfall::Insufficient { available, requested }, Some(missing)) => {
            AppError::InsufficientStock {
                product_id,
                warehouse_id,
                available,
                requested,
                missing,
            }
        }
        _ => AppError::OutOfStock {
            product_id,
            warehouse_id,
        },
    }
}

/// Read-side access to the ledger
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All balances held in a warehouse
    pub async fn list_by_warehouse(&self, warehouse_id: Uuid) -> AppResult<Vec<StockBalanceView>> {
        let rows = sqlx::query_as::<_, StockBalanceView>(
            r#"
            SELECT sb.id, sb.warehouse_id, w.name AS warehouse_name,
                   sb.product_id, p.name AS product_name,
                   sb.quantity, sb.active, sb.updated_at
            FROM stock_balances sb
            JOIN warehouses w ON w.id = sb.warehouse_id
            JOIN products p ON p.id = sb.product_id
            WHERE sb.warehouse_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Balances of one product across warehouses
    pub async fn list_by_product(&self, product_id: Uuid) -> AppResult<Vec<StockBalanceView>> {
        let rows = sqlx::query_as::<_, StockBalanceView>(
            r#"
            SELECT sb.id, sb.warehouse_id, w.name AS warehouse_name,
                   sb.product_id, p.name AS product_name,
                   sb.quantity, sb.active, sb.updated_at
            FROM stock_balances sb
            JOIN warehouses w ON w.id = sb.warehouse_id
            JOIN products p ON p.id = sb.product_id
            WHERE sb.product_id = $1
            ORDER BY w.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
