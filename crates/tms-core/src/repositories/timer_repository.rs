//! Timer repository trait (port)

use async_trait::async_trait;

use crate::domain::{TimerEvent, TimerEventType, TimerTracker};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct NewTimerEvent {
    pub tracker_id: i64,
    pub event_type: TimerEventType,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub performed_by_user_id: Option<i64>,
    pub reason: Option<String>,
    pub duration_change_ms: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerRepository: Send + Sync {
    async fn find<'a>(
        &self,
        entity_type: &str,
        entity_id: i64,
        stage: Option<&'a str>,
    ) -> Result<Option<TimerTracker>, DomainError>;
    async fn list(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<TimerTracker>, DomainError>;
    async fn list_active(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<TimerTracker>, DomainError>;

    /// Insert keyed on (entity_type, entity_id, stage); a restart overwrites
    /// the previous run in place.
    async fn upsert_started(&self, tracker: &TimerTracker)
        -> Result<TimerTracker, DomainError>;
    async fn update(&self, tracker: &TimerTracker) -> Result<TimerTracker, DomainError>;

    async fn log_event(&self, event: &NewTimerEvent) -> Result<(), DomainError>;
    async fn events(&self, tracker_id: i64) -> Result<Vec<TimerEvent>, DomainError>;
}
