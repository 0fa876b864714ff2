//! Expiry notification policy

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key of the single supported notification setting
pub const EXPIRY_POLICY_KEY: &str = "EXPIRY_DAYS_BEFORE";

/// Look-ahead used when no policy has been stored yet
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// Stored notification setting controlling the expiry scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    pub id: Uuid,
    pub key: String,
    pub days_before: i64,
    pub active: bool,
}

/// Payload for `PUT /notification-settings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPolicyUpdate {
    pub key: String,
    pub days_before: i64,
    pub active: bool,
}

impl NotificationPolicy {
    /// Horizon the scanner should use, or `None` when scanning is switched off.
    ///
    /// This is the only place the default horizon is applied.
    pub fn scan_horizon(policy: Option<&NotificationPolicy>) -> Option<i64> {
        match policy {
            None => Some(DEFAULT_HORIZON_DAYS),
            Some(p) if !p.active => None,
            Some(p) => Some(p.days_before),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(days_before: i64, active: bool) -> NotificationPolicy {
        NotificationPolicy {
            id: Uuid::new_v4(),
            key: EXPIRY_POLICY_KEY.to_string(),
            days_before,
            active,
        }
    }

    #[test]
    fn missing_policy_uses_default_horizon() {
        assert_eq!(NotificationPolicy::scan_horizon(None), Some(7));
    }

    #[test]
    fn inactive_policy_disables_scan() {
        assert_eq!(NotificationPolicy::scan_horizon(Some(&policy(3, false))), None);
    }

    #[test]
    fn active_policy_horizon_is_used() {
        assert_eq!(NotificationPolicy::scan_horizon(Some(&policy(14, true))), Some(14));
        assert_eq!(NotificationPolicy::scan_horizon(Some(&policy(0, true))), Some(0));
    }
}
