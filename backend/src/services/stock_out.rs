//! Stock-out pipeline: outgoing stock to customers

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::pricing::effective_sale_price;
use shared::reports::{rank_by_amount, summarize_lines, DailyReport, ReportLine};
use shared::{validate_stock_out, ReferenceKind, StockOutRequest};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ledger;
use crate::services::recorder::{ledger_order, PricedOutLine, TransactionRecorder};

#[derive(Clone)]
pub struct StockOutService {
    db: PgPool,
    recorder: TransactionRecorder,
}

/// Stored stock-out line with display names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockOutLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_id: Uuid,
    pub unit_name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub currency_id: Uuid,
    pub currency_name: String,
}

#[derive(Debug, Clone, FromRow)]
struct StockOutHeaderRow {
    id: Uuid,
    date: NaiveDate,
    warehouse_id: Uuid,
    warehouse_name: String,
    invoice_number: String,
    sale_code: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A recorded stock-out with its lines
#[derive(Debug, Clone, Serialize)]
pub struct StockOutResult {
    pub id: Uuid,
    pub date: NaiveDate,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub invoice_number: String,
    pub sale_code: String,
    pub items: Vec<StockOutLineView>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ReportRow {
    product_id: Uuid,
    product_name: String,
    unit_name: String,
    currency_id: Uuid,
    currency_name: String,
    quantity: Decimal,
    price: Decimal,
}

impl StockOutService {
    pub fn new(db: PgPool, recorder: TransactionRecorder) -> Self {
        Self { db, recorder }
    }

    /// Record a stock-out. Any missing reference, unset price or shortfall on
    /// any line rolls back the whole sale.
    pub async fn record(&self, request: StockOutRequest) -> AppResult<StockOutResult> {
        validate_stock_out(&request)?;

        let mut tx = self.db.begin().await?;

        self.recorder
            .resolve(&mut tx, ReferenceKind::Warehouse, request.warehouse_id)
            .await?;

        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = self.recorder.resolve_product(&mut tx, item.product_id).await?;
            self.recorder
                .resolve_line_refs(&mut tx, item.unit_id, item.currency_id)
                .await?;

            let price = effective_sale_price(item.price, product.current_sale_price)
                .ok_or(AppError::PriceNotSet {
                    product_id: product.id,
                })?;

            lines.push(PricedOutLine {
                product_id: item.product_id,
                unit_id: item.unit_id,
                quantity: item.quantity,
                price,
                currency_id: item.currency_id,
            });
        }

        let stock_out_id = self
            .recorder
            .insert_stock_out(
                &mut tx,
                request.date,
                request.warehouse_id,
                &request.invoice_number,
                &lines,
            )
            .await?;

        let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        for idx in ledger_order(&product_ids) {
            let line = &lines[idx];
            if let Err(err) =
                ledger::decrease(&mut tx, request.warehouse_id, line.product_id, line.quantity).await
            {
                tracing::info!(%stock_out_id, error = %err, "Sale rejected, rolling back");
                return Err(err);
            }
        }

        tx.commit().await?;

        tracing::info!(%stock_out_id, warehouse_id = %request.warehouse_id, "Stock-out committed");

        self.get(stock_out_id).await
    }

    /// Get a stock-out with its lines
    pub async fn get(&self, id: Uuid) -> AppResult<StockOutResult> {
        let header = sqlx::query_as::<_, StockOutHeaderRow>(
            r#"
            SELECT so.id, so.date, so.warehouse_id, w.name AS warehouse_name,
                   so.invoice_number, so.sale_code, so.active, so.created_at, so.updated_at
            FROM stock_outs so
            JOIN warehouses w ON w.id = so.warehouse_id
            WHERE so.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(ReferenceKind::StockOut, id))?;

        let items = sqlx::query_as::<_, StockOutLineView>(
            r#"
            SELECT l.id, l.product_id, p.name AS product_name, l.unit_id, u.name AS unit_name,
                   l.quantity, l.price, l.currency_id, c.name AS currency_name
            FROM stock_out_lines l
            JOIN products p ON p.id = l.product_id
            JOIN units u ON u.id = l.unit_id
            JOIN currencies c ON c.id = l.currency_id
            WHERE l.stock_out_id = $1
            ORDER BY l.line_no
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(StockOutResult {
            id: header.id,
            date: header.date,
            warehouse_id: header.warehouse_id,
            warehouse_name: header.warehouse_name,
            invoice_number: header.invoice_number,
            sale_code: header.sale_code,
            items,
            active: header.active,
            created_at: header.created_at,
            updated_at: header.updated_at,
        })
    }

    /// Sales of `date` per (product, currency), highest amount first
    pub async fn daily_top_sales(&self, date: NaiveDate) -> AppResult<DailyReport> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT l.product_id, p.name AS product_name, u.name AS unit_name,
                   l.currency_id, c.name AS currency_name, l.quantity, l.price
            FROM stock_out_lines l
            JOIN stock_outs so ON so.id = l.stock_out_id
            JOIN products p ON p.id = l.product_id
            JOIN units u ON u.id = l.unit_id
            JOIN currencies c ON c.id = l.currency_id
            WHERE so.date = $1 AND so.active = true AND l.active = true
            ORDER BY so.created_at, l.line_no
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        let items = rank_by_amount(summarize_lines(rows.into_iter().map(|r| ReportLine {
            product_id: r.product_id,
            product_name: r.product_name,
            unit_name: r.unit_name,
            currency_id: r.currency_id,
            currency_name: r.currency_name,
            quantity: r.quantity,
            unit_price: r.price,
        })));

        Ok(DailyReport { date, items })
    }
}
