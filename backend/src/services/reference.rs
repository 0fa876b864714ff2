//! Reference data: warehouses, units, currencies, suppliers and categories

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    CategoryCreateRequest, CategoryUpdateRequest, NamedCreateRequest, NamedUpdateRequest,
    ReferenceKind, SupplierCreateRequest, SupplierUpdateRequest,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Reference kinds that carry only a name and an active flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    Warehouse,
    Unit,
    Currency,
}

impl NamedKind {
    fn table(self) -> &'static str {
        match self {
            NamedKind::Warehouse => "warehouses",
            NamedKind::Unit => "units",
            NamedKind::Currency => "currencies",
        }
    }

    fn reference(self) -> ReferenceKind {
        match self {
            NamedKind::Warehouse => ReferenceKind::Warehouse,
            NamedKind::Unit => ReferenceKind::Unit,
            NamedKind::Currency => ReferenceKind::Currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NamedEntity {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ReferenceService {
    db: PgPool,
}

impl ReferenceService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Warehouses, units, currencies
    // ========================================================================

    pub async fn create_named(
        &self,
        kind: NamedKind,
        input: NamedCreateRequest,
    ) -> AppResult<NamedEntity> {
        input.validate()?;

        let entity = sqlx::query_as::<_, NamedEntity>(&format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name, active, created_at, updated_at",
            kind.table()
        ))
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(id = %entity.id, kind = %kind.reference(), "Reference created");
        Ok(entity)
    }

    pub async fn update_named(
        &self,
        kind: NamedKind,
        id: Uuid,
        input: NamedUpdateRequest,
    ) -> AppResult<NamedEntity> {
        input.validate()?;

        sqlx::query_as::<_, NamedEntity>(&format!(
            r#"
            UPDATE {} SET name = $1, active = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, name, active, created_at, updated_at
            "#,
            kind.table()
        ))
        .bind(input.name.trim())
        .bind(input.active)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(kind.reference(), id))
    }

    pub async fn get_named(&self, kind: NamedKind, id: Uuid) -> AppResult<NamedEntity> {
        sqlx::query_as::<_, NamedEntity>(&format!(
            "SELECT id, name, active, created_at, updated_at FROM {} WHERE id = $1",
            kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(kind.reference(), id))
    }

    pub async fn list_named(&self, kind: NamedKind) -> AppResult<Vec<NamedEntity>> {
        let rows = sqlx::query_as::<_, NamedEntity>(&format!(
            "SELECT id, name, active, created_at, updated_at FROM {} WHERE active = true ORDER BY name",
            kind.table()
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    pub async fn create_supplier(&self, input: SupplierCreateRequest) -> AppResult<Supplier> {
        input.validate()?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, phone) VALUES ($1, $2)
            RETURNING id, name, phone, active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.phone.trim())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(id = %supplier.id, "Supplier created");
        Ok(supplier)
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        input: SupplierUpdateRequest,
    ) -> AppResult<Supplier> {
        input.validate()?;

        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET name = $1, phone = $2, active = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, phone, active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.phone.trim())
        .bind(input.active)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(ReferenceKind::Supplier, id))
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, active, created_at, updated_at
            FROM suppliers WHERE active = true ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    async fn ensure_category(&self, id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found(ReferenceKind::Category, id))
        }
    }

    pub async fn create_category(&self, input: CategoryCreateRequest) -> AppResult<Category> {
        input.validate()?;
        if let Some(parent_id) = input.parent_id {
            self.ensure_category(parent_id).await?;
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, parent_id) VALUES ($1, $2)
            RETURNING id, name, parent_id, active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.parent_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(id = %category.id, "Category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        input: CategoryUpdateRequest,
    ) -> AppResult<Category> {
        input.validate()?;
        if let Some(parent_id) = input.parent_id {
            if parent_id == id {
                return Err(AppError::validation(
                    "parent_id",
                    "A category cannot be its own parent",
                ));
            }
            self.ensure_category(parent_id).await?;
        }

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $1, active = $2, parent_id = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, parent_id, active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.active)
        .bind(input.parent_id)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found(ReferenceKind::Category, id))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, active, created_at, updated_at
            FROM categories WHERE active = true ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_kinds_map_to_tables() {
        assert_eq!(NamedKind::Warehouse.table(), "warehouses");
        assert_eq!(NamedKind::Unit.table(), "units");
        assert_eq!(NamedKind::Currency.table(), "currencies");
    }

    #[test]
    fn named_kinds_report_as_references() {
        assert_eq!(NamedKind::Currency.reference(), ReferenceKind::Currency);
        assert_eq!(NamedKind::Warehouse.reference().to_string(), "Warehouse");
    }
}
