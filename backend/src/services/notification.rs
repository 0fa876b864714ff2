//! Notification policy: the single `EXPIRY_DAYS_BEFORE` setting that drives
//! the expiry scan

use shared::{
    validate_horizon_days, NotificationPolicy, NotificationPolicyUpdate, DEFAULT_HORIZON_DAYS,
    EXPIRY_POLICY_KEY,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct NotificationPolicyService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct PolicyRow {
    id: Uuid,
    key: String,
    days_before: i64,
    active: bool,
}

impl From<PolicyRow> for NotificationPolicy {
    fn from(row: PolicyRow) -> Self {
        NotificationPolicy {
            id: row.id,
            key: row.key,
            days_before: row.days_before,
            active: row.active,
        }
    }
}

impl NotificationPolicyService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Stored policy, if any. The scanner treats `None` as the default horizon.
    pub async fn find(&self) -> AppResult<Option<NotificationPolicy>> {
        let row = sqlx::query_as::<_, PolicyRow>(
            "SELECT id, key, days_before, active FROM notification_settings WHERE key = $1",
        )
        .bind(EXPIRY_POLICY_KEY)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Stored policy, creating the default one on first read
    pub async fn get_or_init(&self) -> AppResult<NotificationPolicy> {
        if let Some(policy) = self.find().await? {
            return Ok(policy);
        }

        // A concurrent first read may insert the same row; the update is a no-op
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            INSERT INTO notification_settings (key, days_before, active)
            VALUES ($1, $2, true)
            ON CONFLICT (key) DO UPDATE SET key = EXCLUDED.key
            RETURNING id, key, days_before, active
            "#,
        )
        .bind(EXPIRY_POLICY_KEY)
        .bind(DEFAULT_HORIZON_DAYS)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(days_before = row.days_before, "Default expiry notification policy created");
        Ok(row.into())
    }

    /// Replace the policy. Only the expiry key is accepted.
    pub async fn update(&self, input: NotificationPolicyUpdate) -> AppResult<NotificationPolicy> {
        if input.key != EXPIRY_POLICY_KEY {
            return Err(AppError::validation(
                "key",
                format!("Unsupported notification setting: {}", input.key),
            ));
        }
        validate_horizon_days(input.days_before)?;

        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            INSERT INTO notification_settings (key, days_before, active)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
                SET days_before = EXCLUDED.days_before,
                    active = EXCLUDED.active,
                    updated_at = NOW()
            RETURNING id, key, days_before, active
            "#,
        )
        .bind(EXPIRY_POLICY_KEY)
        .bind(input.days_before)
        .bind(input.active)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            days_before = row.days_before,
            active = row.active,
            "Expiry notification policy updated"
        );
        Ok(row.into())
    }
}
