//! Warehouse Inventory Backend
//!
//! Stock entries from suppliers and sales to customers move quantities on a
//! per-warehouse ledger inside one database transaction each. A daily scanner
//! alerts the configured Telegram chat about batches close to expiry.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{AlertDispatcher, LogDispatcher, TelegramClient};
use services::{ExpiryScanner, PgExpiryStore, TransactionRecorder};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub recorder: TransactionRecorder,
    pub scanner: Arc<ExpiryScanner>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let dispatcher: Arc<dyn AlertDispatcher> = if config.telegram.bot_token.is_empty() {
            tracing::warn!("telegram.bot_token is empty, expiry alerts will only be logged");
            Arc::new(LogDispatcher)
        } else {
            Arc::new(TelegramClient::new(&config.telegram)?)
        };

        let scanner = ExpiryScanner::new(
            Arc::new(PgExpiryStore::new(db.clone())),
            dispatcher,
            config.telegram.chat_id.clone(),
            Duration::from_secs(config.telegram.timeout_secs),
        );

        Ok(Self {
            recorder: TransactionRecorder::new(config.codes.max_attempts),
            scanner: Arc::new(scanner),
            config: Arc::new(config),
            db,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn root() -> &'static str {
    "Warehouse Inventory API v1"
}
