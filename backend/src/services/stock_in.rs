//! Stock-in pipeline: incoming stock from suppliers
//!
//! One request is one database transaction covering the header, every line,
//! the ledger increases and the sale price updates of the touched products.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::pricing::last_sale_prices;
use shared::reports::{summarize_lines, DailyReport, ReportLine};
use shared::{validate_stock_in, ReferenceKind, StockInRequest};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ledger;
use crate::services::recorder::{ledger_order, TransactionRecorder};

#[derive(Clone)]
pub struct StockInService {
    db: PgPool,
    recorder: TransactionRecorder,
}

/// Stored stock-in line with display names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockInLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_id: Uuid,
    pub unit_name: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub currency_id: Uuid,
    pub currency_name: String,
}

/// Stored stock-in header
#[derive(Debug, Clone, FromRow)]
struct StockInHeaderRow {
    id: Uuid,
    date: NaiveDate,
    warehouse_id: Uuid,
    warehouse_name: String,
    supplier_id: Uuid,
    supplier_name: String,
    invoice_number: String,
    entry_code: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A recorded stock-in with its lines
#[derive(Debug, Clone, Serialize)]
pub struct StockInResult {
    pub id: Uuid,
    pub date: NaiveDate,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub invoice_number: String,
    pub entry_code: String,
    pub items: Vec<StockInLineView>,
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
    purchase_price: Decimal,
}

impl StockInService {
    pub fn new(db: PgPool, recorder: TransactionRecorder) -> Self {
        Self { db, recorder }
    }

    /// Record a stock-in: store header and lines, increase the ledger per
    /// line and set each touched product's sale price to its last line's.
    pub async fn record(&self, request: StockInRequest) -> AppResult<StockInResult> {
        validate_stock_in(&request)?;

        let mut tx = self.db.begin().await?;

        self.recorder
            .resolve(&mut tx, ReferenceKind::Warehouse, request.warehouse_id)
            .await?;
        self.recorder
            .resolve(&mut tx, ReferenceKind::Supplier, request.supplier_id)
            .await?;
        for item in &request.items {
            self.recorder.resolve_product(&mut tx, item.product_id).await?;
            self.recorder
                .resolve_line_refs(&mut tx, item.unit_id, item.currency_id)
                .await?;
        }

        let stock_in_id = self.recorder.insert_stock_in(&mut tx, &request).await?;

        let product_ids: Vec<Uuid> = request.items.iter().map(|i| i.product_id).collect();
        for idx in ledger_order(&product_ids) {
            let item = &request.items[idx];
            ledger::increase(&mut tx, request.warehouse_id, item.product_id, item.quantity).await?;
        }

        let prices = last_sale_prices(request.items.iter().map(|i| (i.product_id, i.sale_price)));
        for (product_id, sale_price) in &prices {
            sqlx::query(
                "UPDATE products SET current_sale_price = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(sale_price)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %stock_in_id,
            warehouse_id = %request.warehouse_id,
            products_repriced = prices.len(),
            "Stock-in committed"
        );

        self.get(stock_in_id).await
    }

    /// Get a stock-in with its lines
    pub async fn get(&self, id: Uuid) -> AppResult<StockInResult> {
        let header = sqlx::query_as::<_, StockInHeaderRow>(
            r#"
            SELECT si.id, si.date, si.warehouse_id, w.name AS warehouse_name,
                   si.supplier_id, s.name AS supplier_name, si.invoice_number,
                   si.entry_code, si.active, si.created_at, si.updated_at
            FROM stock_ins si
            JOIN warehouses w ON w.id = si.warehouse_id
            JOIN suppliers s ON s.id = si.supplier_id
            WHERE si.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(ReferenceKind::StockIn, id))?;

        let items = sqlx::query_as::<_, StockInLineView>(
            r#"
            SELECT l.id, l.product_id, p.name AS product_name, l.unit_id, u.name AS unit_name,
                   l.quantity, l.purchase_price, l.sale_price, l.expiry_date,
                   l.currency_id, c.name AS currency_name
            FROM stock_in_lines l
            JOIN products p ON p.id = l.product_id
            JOIN units u ON u.id = l.unit_id
            JOIN currencies c ON c.id = l.currency_id
            WHERE l.stock_in_id = $1
            ORDER BY l.line_no
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(StockInResult {
            id: header.id,
            date: header.date,
            warehouse_id: header.warehouse_id,
            warehouse_name: header.warehouse_name,
            supplier_id: header.supplier_id,
            supplier_name: header.supplier_name,
            invoice_number: header.invoice_number,
            entry_code: header.entry_code,
            items,
            active: header.active,
            created_at: header.created_at,
            updated_at: header.updated_at,
        })
    }

    /// Quantity and purchase amount received on `date`, per (product, currency)
    pub async fn daily_summary(&self, date: NaiveDate) -> AppResult<DailyReport> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT l.product_id, p.name AS product_name, u.name AS unit_name,
                   l.currency_id, c.name AS currency_name, l.quantity, l.purchase_price
            FROM stock_in_lines l
            JOIN stock_ins si ON si.id = l.stock_in_id
            JOIN products p ON p.id = l.product_id
            JOIN units u ON u.id = l.unit_id
            JOIN currencies c ON c.id = l.currency_id
            WHERE si.date = $1 AND si.active = true AND l.active = true
            ORDER BY si.created_at, l.line_no
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        let items = summarize_lines(rows.into_iter().map(|r| ReportLine {
            product_id: r.product_id,
            product_name: r.product_name,
            unit_name: r.unit_name,
            currency_id: r.currency_id,
            currency_name: r.currency_name,
            quantity: r.quantity,
            unit_price: r.purchase_price,
        }));

        Ok(DailyReport { date, items })
    }
}
