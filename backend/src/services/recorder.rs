//! Transaction recorder: reference resolution, business codes and the
//! header + lines inserts shared by the stock-in and stock-out pipelines.
//!
//! Everything here runs on the pipeline's open transaction. A failed lookup
//! returns `NotFound` and the caller drops the transaction, so no header or
//! line of the request survives.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::codes::{new_code, CodeKind};
use shared::{ReferenceKind, StockInRequest};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Referenced row reduced to what the pipelines need
#[derive(Debug, Clone, FromRow)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductRef {
    pub id: Uuid,
    pub name: String,
    pub current_sale_price: Decimal,
}

/// Stock-out line ready to be stored, with its effective price
#[derive(Debug, Clone)]
pub struct PricedOutLine {
    pub product_id: Uuid,
    pub unit_id: Uuid,
    pub quantity: Decimal,
    pub price: Decimal,
    pub currency_id: Uuid,
}

/// Table holding rows of a reference kind that resolve to a [`NamedRef`]
fn named_table(kind: ReferenceKind) -> Option<&'static str> {
    match kind {
        ReferenceKind::Warehouse => Some("warehouses"),
        ReferenceKind::Category => Some("categories"),
        ReferenceKind::Unit => Some("units"),
        ReferenceKind::Currency => Some("currencies"),
        ReferenceKind::Supplier => Some("suppliers"),
        ReferenceKind::Product | ReferenceKind::StockIn | ReferenceKind::StockOut => None,
    }
}

/// Table and column a business code is unique in
fn code_column(kind: CodeKind) -> Option<(&'static str, &'static str)> {
    match kind {
        CodeKind::Product => Some(("products", "product_code")),
        CodeKind::StockIn => Some(("stock_ins", "entry_code")),
        CodeKind::StockOut => Some(("stock_outs", "sale_code")),
        CodeKind::Worker | CodeKind::Registration => None,
    }
}

/// Map a unique violation on insert to `DuplicateEntry(field)`
pub fn unique_violation_as_duplicate(err: sqlx::Error, field: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::DuplicateEntry(field.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

#[derive(Debug, Clone)]
pub struct TransactionRecorder {
    max_code_attempts: u32,
}

impl TransactionRecorder {
    pub fn new(max_code_attempts: u32) -> Self {
        Self {
            max_code_attempts: max_code_attempts.max(1),
        }
    }

    /// Resolve a warehouse, category, unit, currency or supplier by id
    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        kind: ReferenceKind,
        id: Uuid,
    ) -> AppResult<NamedRef> {
        let table = named_table(kind)
            .ok_or_else(|| AppError::Internal(format!("{kind} is not a named reference")))?;

        sqlx::query_as::<_, NamedRef>(&format!("SELECT id, name FROM {table} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::not_found(kind, id))
    }

    pub async fn resolve_product(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<ProductRef> {
        sqlx::query_as::<_, ProductRef>(
            "SELECT id, name, current_sale_price FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::not_found(ReferenceKind::Product, id))
    }

    /// Resolve the unit and currency of one line
    pub async fn resolve_line_refs(
        &self,
        conn: &mut PgConnection,
        unit_id: Uuid,
        currency_id: Uuid,
    ) -> AppResult<(NamedRef, NamedRef)> {
        let unit = self.resolve(conn, ReferenceKind::Unit, unit_id).await?;
        let currency = self.resolve(conn, ReferenceKind::Currency, currency_id).await?;
        Ok((unit, currency))
    }

    /// Generate a business code not yet present in storage.
    ///
    /// Retries up to the configured number of candidates; the column's
    /// `UNIQUE` constraint still guards against a concurrent insert of the
    /// same candidate.
    pub async fn unique_code(&self, conn: &mut PgConnection, kind: CodeKind) -> AppResult<String> {
        let (table, column) = code_column(kind).ok_or_else(|| {
            AppError::Internal(format!("{} codes are not stored here", kind.prefix()))
        })?;

        for attempt in 1..=self.max_code_attempts {
            let code = new_code(kind);
            let taken = sqlx::query_scalar::<_, bool>(&format!(
                "SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = $1)"
            ))
            .bind(&code)
            .fetch_one(&mut *conn)
            .await?;

            if !taken {
                return Ok(code);
            }
            tracing::warn!(%code, attempt, "Generated business code already in use");
        }

        Err(AppError::Internal(format!(
            "could not generate a unique {} code after {} attempts",
            kind.prefix(),
            self.max_code_attempts
        )))
    }

    /// Insert a stock-in header and its lines; returns the header id
    pub async fn insert_stock_in(
        &self,
        conn: &mut PgConnection,
        request: &StockInRequest,
    ) -> AppResult<Uuid> {
        let entry_code = self.unique_code(conn, CodeKind::StockIn).await?;

        let stock_in_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_ins (date, warehouse_id, supplier_id, invoice_number, entry_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(request.date)
        .bind(request.warehouse_id)
        .bind(request.supplier_id)
        .bind(request.invoice_number.trim())
        .bind(&entry_code)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| unique_violation_as_duplicate(e, "entry_code"))?;

        for (line_no, item) in request.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO stock_in_lines (stock_in_id, line_no, product_id, unit_id, quantity,
                                            purchase_price, sale_price, expiry_date, currency_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(stock_in_id)
            .bind(line_no as i32)
            .bind(item.product_id)
            .bind(item.unit_id)
            .bind(item.quantity)
            .bind(item.purchase_price)
            .bind(item.sale_price)
            .bind(item.expiry_date)
            .bind(item.currency_id)
            .execute(&mut *conn)
            .await?;
        }

        tracing::info!(%stock_in_id, %entry_code, lines = request.items.len(), "Stock entry recorded");
        Ok(stock_in_id)
    }

    /// Insert a stock-out header and its priced lines; returns the header id
    pub async fn insert_stock_out(
        &self,
        conn: &mut PgConnection,
        date: NaiveDate,
        warehouse_id: Uuid,
        invoice_number: &str,
        lines: &[PricedOutLine],
    ) -> AppResult<Uuid> {
        let sale_code = self.unique_code(conn, CodeKind::StockOut).await?;

        let stock_out_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_outs (date, warehouse_id, invoice_number, sale_code)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(date)
        .bind(warehouse_id)
        .bind(invoice_number.trim())
        .bind(&sale_code)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| unique_violation_as_duplicate(e, "sale_code"))?;

        for (line_no, line) in lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO stock_out_lines (stock_out_id, line_no, product_id, unit_id,
                                             quantity, price, currency_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(stock_out_id)
            .bind(line_no as i32)
            .bind(line.product_id)
            .bind(line.unit_id)
            .bind(line.quantity)
            .bind(line.price)
            .bind(line.currency_id)
            .execute(&mut *conn)
            .await?;
        }

        tracing::info!(%stock_out_id, %sale_code, lines = lines.len(), "Sale recorded");
        Ok(stock_out_id)
    }
}

/// Indices of `product_ids` in ascending product order, stable for equal ids.
///
/// Ledger rows are mutated in this order so two multi-line requests always
/// lock shared rows in the same sequence.
pub fn ledger_order(product_ids: &[Uuid]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..product_ids.len()).collect();
    order.sort_by_key(|&idx| product_ids[idx]);
    order
}
