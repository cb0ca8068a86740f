//! PostgreSQL email log repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use tms_core::error::DomainError;
use tms_core::repositories::{EmailLogRepository, NewEmailLog};

pub struct PgEmailLogRepository {
    pool: PgPool,
}

impl PgEmailLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl EmailLogRepository for PgEmailLogRepository {
    async fn create_queued(&self, log: &NewEmailLog) -> Result<i64, DomainError> {
        let recipients = serde_json::to_value(&log.recipients)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        sqlx::query_scalar(
            r#"
            INSERT INTO email_logs (template, recipients, subject, status, follow_up_id)
            VALUES ($1, $2, $3, 'queued', $4)
            RETURNING id
            "#,
        )
        .bind(&log.template)
        .bind(recipients)
        .bind(&log.subject)
        .bind(log.follow_up_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("queueing email log", e))
    }

    async fn mark_sent(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE email_logs
            SET status = 'sent', attempts = attempts + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("marking email sent", e))?;
        Ok(())
    }

    async fn mark_failed(&self, id: i64, last_error: &str, attempts: u32) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE email_logs
            SET status = 'failed', attempts = $3, last_error = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(last_error)
        .bind(attempts as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("marking email failed", e))?;
        Ok(())
    }
}
