//! Outbound mail ports: log table and broker queue

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// A queued message: template name plus render context, not a rendered body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub email_log_id: i64,
    pub template: String,
    pub context: Value,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub follow_up_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewEmailLog {
    pub template: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub follow_up_id: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailLogRepository: Send + Sync {
    async fn create_queued(&self, log: &NewEmailLog) -> Result<i64, DomainError>;
    async fn mark_sent(&self, id: i64) -> Result<(), DomainError>;
    async fn mark_failed(&self, id: i64, error: &str, attempts: u32) -> Result<(), DomainError>;
}

/// At-least-once broker queue; redelivery happens by re-pushing on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailQueue: Send + Sync {
    async fn enqueue(&self, email: &OutboundEmail) -> Result<(), DomainError>;
    /// Blocks up to `timeout_secs`; `None` on timeout.
    async fn dequeue(&self, timeout_secs: u64) -> Result<Option<OutboundEmail>, DomainError>;
    async fn requeue(&self, email: &OutboundEmail) -> Result<(), DomainError>;
}
