//! HTTP handlers for reference data
//!
//! Warehouses, units and currencies share the `*_named` handlers; the route
//! table binds each one to its [`NamedKind`].

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{
    ApiResponse, CategoryCreateRequest, CategoryUpdateRequest, NamedCreateRequest,
    NamedUpdateRequest, SupplierCreateRequest, SupplierUpdateRequest,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::reference::{Category, NamedEntity, NamedKind, ReferenceService, Supplier};
use crate::AppState;

pub async fn create_named(
    kind: NamedKind,
    State(state): State<AppState>,
    Json(input): Json<NamedCreateRequest>,
) -> AppResult<Json<ApiResponse<NamedEntity>>> {
    let entity = ReferenceService::new(state.db).create_named(kind, input).await?;
    Ok(Json(ApiResponse::ok(entity)))
}

pub async fn update_named(
    kind: NamedKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NamedUpdateRequest>,
) -> AppResult<Json<ApiResponse<NamedEntity>>> {
    let entity = ReferenceService::new(state.db)
        .update_named(kind, id, input)
        .await?;
    Ok(Json(ApiResponse::ok(entity)))
}

pub async fn get_named(
    kind: NamedKind,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NamedEntity>>> {
    let entity = ReferenceService::new(state.db).get_named(kind, id).await?;
    Ok(Json(ApiResponse::ok(entity)))
}

pub async fn list_named(
    kind: NamedKind,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<NamedEntity>>>> {
    let entities = ReferenceService::new(state.db).list_named(kind).await?;
    Ok(Json(ApiResponse::ok(entities)))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierCreateRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let supplier = ReferenceService::new(state.db).create_supplier(input).await?;
    Ok(Json(ApiResponse::ok(supplier)))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SupplierUpdateRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let supplier = ReferenceService::new(state.db)
        .update_supplier(id, input)
        .await?;
    Ok(Json(ApiResponse::ok(supplier)))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Supplier>>>> {
    let suppliers = ReferenceService::new(state.db).list_suppliers().await?;
    Ok(Json(ApiResponse::ok(suppliers)))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryCreateRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = ReferenceService::new(state.db).create_category(input).await?;
    Ok(Json(ApiResponse::ok(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryUpdateRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = ReferenceService::new(state.db)
        .update_category(id, input)
        .await?;
    Ok(Json(ApiResponse::ok(category)))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = ReferenceService::new(state.db).list_categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}
