//! Route definitions for the warehouse inventory API

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use shared::{NamedCreateRequest, NamedUpdateRequest};
use uuid::Uuid;

use crate::{handlers, services::NamedKind, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Transactions
        .route("/stock-entries", post(handlers::record_stock_in))
        .route("/stock-entries/:id", get(handlers::get_stock_in))
        .route("/sales", post(handlers::record_stock_out))
        .route("/sales/:id", get(handlers::get_stock_out))
        // Reports and balances
        .nest("/dashboard", dashboard_routes())
        .route("/stock/warehouses/:id", get(handlers::warehouse_stock))
        .route("/stock/products/:id", get(handlers::product_stock))
        .route(
            "/notification-settings",
            get(handlers::get_notification_policy).put(handlers::update_notification_policy),
        )
        // Reference data
        .nest("/warehouses", named_routes(NamedKind::Warehouse))
        .nest("/units", named_routes(NamedKind::Unit))
        .nest("/currencies", named_routes(NamedKind::Currency))
        .nest("/suppliers", supplier_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stock-in", get(handlers::daily_stock_in_summary))
        .route("/sales", get(handlers::daily_top_sales))
        .route("/expiring", get(handlers::expiring_products))
}

/// CRUD routes for a reference kind that only has a name
fn named_routes(kind: NamedKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |state: State<AppState>| handlers::list_named(kind, state)).post(
                move |state: State<AppState>, input: Json<NamedCreateRequest>| {
                    handlers::create_named(kind, state, input)
                },
            ),
        )
        .route(
            "/:id",
            get(move |state: State<AppState>, id: Path<Uuid>| {
                handlers::get_named(kind, state, id)
            })
            .put(
                move |state: State<AppState>, id: Path<Uuid>, input: Json<NamedUpdateRequest>| {
                    handlers::update_named(kind, state, id, input)
                },
            ),
        )
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route("/:id", put(handlers::update_supplier))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/:id", put(handlers::update_category))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:id",
            get(handlers::get_product).put(handlers::update_product),
        )
}
