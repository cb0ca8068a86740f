//! Redis-backed outbound mail queue
//!
//! A plain list with blocking pops. Delivery is at-least-once: the worker
//! pushes a message back when sending fails and it should be retried.

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use deadpool_redis::redis::AsyncCommands;
use tracing::debug;

use tms_shared::constants::MAIL_QUEUE_KEY;

use tms_core::error::DomainError;
use tms_core::repositories::{MailQueue, OutboundEmail};

pub struct RedisMailQueue {
    pool: Pool,
    queue_key: String,
}

impl RedisMailQueue {
    pub fn connect(url: &str) -> Result<Self, DomainError> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::QueueError(e.to_string()))?;
        Ok(Self { pool, queue_key: MAIL_QUEUE_KEY.to_string() })
    }

    async fn push(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        let payload =
            serde_json::to_string(email).map_err(|e| DomainError::InternalError(e.to_string()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| DomainError::QueueError(e.to_string()))?;
        let _: () = conn
            .lpush(&self.queue_key, payload)
            .await
            .map_err(|e| DomainError::QueueError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MailQueue for RedisMailQueue {
    async fn enqueue(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        debug!(email_log_id = email.email_log_id, "enqueueing mail");
        self.push(email).await
    }

    async fn dequeue(&self, timeout_secs: u64) -> Result<Option<OutboundEmail>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| DomainError::QueueError(e.to_string()))?;

        let popped: Option<(String, String)> = conn
            .brpop(&self.queue_key, timeout_secs as f64)
            .await
            .map_err(|e| DomainError::QueueError(e.to_string()))?;

        match popped {
            Some((_key, payload)) => {
                let email = serde_json::from_str(&payload)
                    .map_err(|e| DomainError::QueueError(format!("bad queue payload: {e}")))?;
                Ok(Some(email))
            }
            None => Ok(None),
        }
    }

    async fn requeue(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        debug!(email_log_id = email.email_log_id, "requeueing mail");
        self.push(email).await
    }
}
