//! Expiry alert scanner
//!
//! Once a day the scanner looks for stock-in batches expiring within the
//! policy horizon and sends one alert per (batch, channel). The alert record
//! is written only after the channel accepted the message, so a failed send
//! is retried on the next run and a delivered one is never repeated.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::expiry::{ExpiringBatch, ExpiryWindow};
use shared::{validate_horizon_days, NotificationPolicy, DEFAULT_HORIZON_DAYS};
use sqlx::{FromRow, PgPool};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::{AlertDispatcher, DispatchError};
use crate::services::notification::NotificationPolicyService;

/// Storage the scanner reads batches from and records sent alerts in
#[async_trait]
pub trait ExpiryAlertStore: Send + Sync {
    async fn load_policy(&self) -> AppResult<Option<NotificationPolicy>>;

    /// Active batches whose expiry date falls inside `window`
    async fn find_expiring(&self, window: ExpiryWindow) -> AppResult<Vec<ExpiringBatch>>;

    async fn already_alerted(&self, stock_in_line_id: Uuid, channel: &str) -> AppResult<bool>;

    /// Record a delivered alert. Recording the same pair twice is a no-op.
    async fn record_alert(
        &self,
        stock_in_line_id: Uuid,
        channel: &str,
        sent_at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// PostgreSQL-backed alert store
#[derive(Clone)]
pub struct PgExpiryStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct BatchRow {
    stock_in_line_id: Uuid,
    product_id: Uuid,
    product_name: String,
    warehouse_id: Uuid,
    warehouse_name: String,
    quantity: Decimal,
    unit_name: String,
    expiry_date: NaiveDate,
}

impl PgExpiryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExpiryAlertStore for PgExpiryStore {
    async fn load_policy(&self) -> AppResult<Option<NotificationPolicy>> {
        NotificationPolicyService::new(self.db.clone()).find().await
    }

    async fn find_expiring(&self, window: ExpiryWindow) -> AppResult<Vec<ExpiringBatch>> {
        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT l.id AS stock_in_line_id, l.product_id, p.name AS product_name,
                   si.warehouse_id, w.name AS warehouse_name,
                   l.quantity, u.name AS unit_name, l.expiry_date
            FROM stock_in_lines l
            JOIN stock_ins si ON si.id = l.stock_in_id
            JOIN products p ON p.id = l.product_id
            JOIN warehouses w ON w.id = si.warehouse_id
            JOIN units u ON u.id = l.unit_id
            WHERE l.active = true AND si.active = true
              AND l.expiry_date IS NOT NULL
              AND l.expiry_date BETWEEN $1 AND $2
            ORDER BY l.expiry_date, p.name
            "#,
        )
        .bind(window.from)
        .bind(window.to)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ExpiringBatch {
                stock_in_line_id: r.stock_in_line_id,
                product_id: r.product_id,
                product_name: r.product_name,
                warehouse_id: r.warehouse_id,
                warehouse_name: r.warehouse_name,
                quantity: r.quantity,
                unit_name: r.unit_name,
                expiry_date: r.expiry_date,
            })
            .collect())
    }

    async fn already_alerted(&self, stock_in_line_id: Uuid, channel: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM expiry_alerts WHERE stock_in_line_id = $1 AND channel = $2)",
        )
        .bind(stock_in_line_id)
        .bind(channel)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    async fn record_alert(
        &self,
        stock_in_line_id: Uuid,
        channel: &str,
        sent_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO expiry_alerts (stock_in_line_id, channel, sent_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (stock_in_line_id, channel) DO NOTHING
            "#,
        )
        .bind(stock_in_line_id)
        .bind(channel)
        .bind(sent_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

/// Counters of one completed scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub scanned: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The policy is switched off
    Disabled,
    /// Another scan holds the run lock
    AlreadyRunning,
    Completed(ScanReport),
}

/// Batch listed on the expiring-products dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ExpiringProductView {
    #[serde(flatten)]
    pub batch: ExpiringBatch,
    pub days_left: i64,
}

enum BatchResult {
    Sent,
    Skipped,
}

pub struct ExpiryScanner {
    store: Arc<dyn ExpiryAlertStore>,
    dispatcher: Arc<dyn AlertDispatcher>,
    channel: String,
    dispatch_timeout: Duration,
    run_lock: Mutex<()>,
}

impl ExpiryScanner {
    pub fn new(
        store: Arc<dyn ExpiryAlertStore>,
        dispatcher: Arc<dyn AlertDispatcher>,
        channel: impl Into<String>,
        dispatch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            dispatcher,
            channel: channel.into(),
            dispatch_timeout,
            run_lock: Mutex::new(()),
        }
    }

    /// Run one scan for `today`.
    ///
    /// Errors loading the policy or the batches fail the whole run; errors on
    /// a single batch are logged and counted in the report.
    pub async fn run(&self, today: NaiveDate) -> AppResult<ScanOutcome> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            tracing::warn!("Expiry scan already running, skipping trigger");
            return Ok(ScanOutcome::AlreadyRunning);
        };

        let policy = self.store.load_policy().await?;
        let Some(horizon) = NotificationPolicy::scan_horizon(policy.as_ref()) else {
            tracing::info!("Expiry notifications are disabled");
            return Ok(ScanOutcome::Disabled);
        };

        let window = ExpiryWindow::starting(today, horizon);
        let batches = self.store.find_expiring(window).await?;

        tracing::info!(
            from = %window.from,
            to = %window.to,
            batches = batches.len(),
            "Expiry scan started"
        );

        let mut report = ScanReport {
            scanned: batches.len(),
            ..ScanReport::default()
        };

        for batch in &batches {
            match self.alert_batch(batch, today).await {
                Ok(BatchResult::Sent) => report.sent += 1,
                Ok(BatchResult::Skipped) => report.skipped += 1,
                Err(err) => {
                    tracing::warn!(
                        stock_in_line_id = %batch.stock_in_line_id,
                        product = %batch.product_name,
                        error = %err,
                        "Expiry alert failed, will retry next run"
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "Expiry scan finished"
        );

        Ok(ScanOutcome::Completed(report))
    }

    async fn alert_batch(
        &self,
        batch: &ExpiringBatch,
        today: NaiveDate,
    ) -> Result<BatchResult, ScanError> {
        if self
            .store
            .already_alerted(batch.stock_in_line_id, &self.channel)
            .await?
        {
            return Ok(BatchResult::Skipped);
        }

        let text = batch.alert_message(today);
        tokio::time::timeout(self.dispatch_timeout, self.dispatcher.send(&text))
            .await
            .map_err(|_| DispatchError::Timeout(self.dispatch_timeout))??;

        if let Err(err) = self
            .store
            .record_alert(batch.stock_in_line_id, &self.channel, Utc::now())
            .await
        {
            tracing::error!(
                stock_in_line_id = %batch.stock_in_line_id,
                error = %err,
                "Expiry alert sent but not recorded"
            );
        }

        Ok(BatchResult::Sent)
    }

    /// Batches expiring within `days` of `as_of`. Without `days` the stored
    /// policy's horizon is used, even when the policy is inactive.
    pub async fn expiring_products(
        &self,
        as_of: NaiveDate,
        days: Option<i64>,
    ) -> AppResult<Vec<ExpiringProductView>> {
        let horizon = match days {
            Some(days) => {
                validate_horizon_days(days)?;
                days
            }
            None => self
                .store
                .load_policy()
                .await?
                .map(|p| p.days_before)
                .unwrap_or(DEFAULT_HORIZON_DAYS),
        };

        let batches = self
            .store
            .find_expiring(ExpiryWindow::starting(as_of, horizon))
            .await?;

        Ok(batches
            .into_iter()
            .map(|batch| ExpiringProductView {
                days_left: batch.days_left(as_of),
                batch,
            })
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
enum ScanError {
    #[error(transparent)]
    Store(#[from] crate::error::AppError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// First moment strictly after `now` whose time of day is `at`
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

/// Fire the scan every day at `at` local time. Each run completes before the
/// next fire time is computed.
pub async fn run_daily(scanner: Arc<ExpiryScanner>, at: NaiveTime) {
    tracing::info!(%at, "Expiry scheduler started");

    loop {
        let now = Local::now().naive_local();
        let next = next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(%next, "Next expiry scan scheduled");
        tokio::time::sleep(wait).await;

        let today = Local::now().date_naive();
        match scanner.run(today).await {
            Ok(outcome) => tracing::debug!(?outcome, "Expiry scan outcome"),
            Err(err) => tracing::error!(error = %err, "Expiry scan failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn moment(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_time(at(h, m))
    }

    #[test]
    fn fires_later_today_when_time_not_reached() {
        assert_eq!(next_run_after(moment(5, 8, 30), at(9, 0)), moment(5, 9, 0));
    }

    #[test]
    fn fires_tomorrow_once_time_has_passed() {
        assert_eq!(next_run_after(moment(5, 9, 0), at(9, 0)), moment(6, 9, 0));
        assert_eq!(next_run_after(moment(5, 23, 59), at(9, 0)), moment(6, 9, 0));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(ScanOutcome::Completed(ScanReport {
            scanned: 2,
            sent: 1,
            skipped: 1,
            failed: 0,
        }))
        .unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["sent"], 1);
    }
}
