//! PostgreSQL business calendar repository

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::PgPool;
use tracing::error;

use tms_core::error::DomainError;
use tms_core::repositories::CalendarRepository;

pub struct PgCalendarRepository {
    pool: PgPool,
}

impl PgCalendarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarRepository for PgCalendarRepository {
    async fn working_hours_value(&self) -> Result<Option<Value>, DomainError> {
        sqlx::query_scalar("SELECT value FROM app_settings WHERE key = 'working_hours'")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error loading working hours: {}", e);
                DomainError::DatabaseError(e.to_string())
            })
    }

    async fn holidays_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT date FROM business_calendar
            WHERE date >= $1 AND date <= $2 AND is_holiday = TRUE
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error loading holidays: {}", e);
            DomainError::DatabaseError(e.to_string())
        })
    }
}
