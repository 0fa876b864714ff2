//! Product catalogue

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::codes::CodeKind;
use shared::{
    validate_non_negative_price, ProductCreateRequest, ProductUpdateRequest, ReferenceKind,
};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::recorder::{unique_violation_as_duplicate, TransactionRecorder};

#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
    recorder: TransactionRecorder,
}

/// Product with its reference names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub product_code: String,
    pub name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub unit_id: Uuid,
    pub unit_name: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub current_sale_price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.product_code, p.name,
           p.category_id, c.name AS category_name,
           p.unit_id, u.name AS unit_name,
           p.supplier_id, s.name AS supplier_name,
           p.current_sale_price, p.active, p.created_at, p.updated_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
    JOIN units u ON u.id = p.unit_id
    JOIN suppliers s ON s.id = p.supplier_id
"#;

impl ProductService {
    pub fn new(db: PgPool, recorder: TransactionRecorder) -> Self {
        Self { db, recorder }
    }

    async fn resolve_refs(
        &self,
        conn: &mut PgConnection,
        category_id: Uuid,
        unit_id: Uuid,
        supplier_id: Uuid,
    ) -> AppResult<()> {
        self.recorder
            .resolve(conn, ReferenceKind::Category, category_id)
            .await?;
        self.recorder.resolve(conn, ReferenceKind::Unit, unit_id).await?;
        self.recorder
            .resolve(conn, ReferenceKind::Supplier, supplier_id)
            .await?;
        Ok(())
    }

    pub async fn create(&self, input: ProductCreateRequest) -> AppResult<Product> {
        input.validate()?;
        let price = input.current_sale_price.unwrap_or(Decimal::ZERO);
        validate_non_negative_price("current_sale_price", price)?;

        let mut tx = self.db.begin().await?;
        self.resolve_refs(&mut tx, input.category_id, input.unit_id, input.supplier_id)
            .await?;

        let product_code = self.recorder.unique_code(&mut tx, CodeKind::Product).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (product_code, name, category_id, unit_id, supplier_id,
                                  current_sale_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&product_code)
        .bind(input.name.trim())
        .bind(input.category_id)
        .bind(input.unit_id)
        .bind(input.supplier_id)
        .bind(price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation_as_duplicate(e, "product_code"))?;

        tx.commit().await?;

        tracing::info!(%id, %product_code, "Product created");
        self.get(id).await
    }

    /// Update a product. A missing `current_sale_price` keeps the stored one.
    pub async fn update(&self, id: Uuid, input: ProductUpdateRequest) -> AppResult<Product> {
        input.validate()?;
        if let Some(price) = input.current_sale_price {
            validate_non_negative_price("current_sale_price", price)?;
        }

        let mut tx = self.db.begin().await?;
        self.resolve_refs(&mut tx, input.category_id, input.unit_id, input.supplier_id)
            .await?;

        let updated = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, category_id = $2, unit_id = $3, supplier_id = $4, active = $5,
                current_sale_price = COALESCE($6, current_sale_price), updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(input.name.trim())
        .bind(input.category_id)
        .bind(input.unit_id)
        .bind(input.supplier_id)
        .bind(input.active)
        .bind(input.current_sale_price)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(ReferenceKind::Product, id));
        }

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(ReferenceKind::Product, id))
    }

    pub async fn list_active(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "{PRODUCT_SELECT} WHERE p.active = true ORDER BY p.name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
