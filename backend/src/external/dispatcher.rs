//! Outbound alert channel

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("alert channel request failed: {0}")]
    Transport(String),

    #[error("alert channel rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("alert dispatch timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Sends one plain-text message to the configured alert channel
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), DispatchError>;
}

/// Dispatcher used when no bot token is configured: messages only reach the log
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

#[async_trait]
impl AlertDispatcher for LogDispatcher {
    async fn send(&self, text: &str) -> Result<(), DispatchError> {
        tracing::info!(message = %text, "Alert channel not configured, logging alert");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_dispatcher_always_succeeds() {
        assert!(LogDispatcher.send("hello").await.is_ok());
    }

    #[test]
    fn rejected_error_names_status() {
        let err = DispatchError::Rejected {
            status: 401,
            body: "Unauthorized".into(),
        };
        assert_eq!(
            err.to_string(),
            "alert channel rejected the message (401): Unauthorized"
        );
    }
}
