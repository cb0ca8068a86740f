//! Business calendar repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Raw `working_hours` settings value, if configured.
    async fn working_hours_value(&self) -> Result<Option<Value>, DomainError>;
    async fn holidays_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, DomainError>;
}
