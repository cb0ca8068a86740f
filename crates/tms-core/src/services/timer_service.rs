//! Stage timer lifecycle

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::info;

use tms_shared::constants::{
    DEFAULT_CRITICAL_THRESHOLD, DEFAULT_TIMER_HOURS, DEFAULT_WARNING_THRESHOLD,
};
use tms_shared::utils::hours_to_ms;

use crate::domain::{
    TimerConfig, TimerEvent, TimerEventType, TimerSnapshot, TimerStatus, TimerTracker, TimerType,
};
use crate::error::DomainError;
use crate::repositories::{NewTimerEvent, TimerRepository};

#[derive(Debug, Clone, Default)]
pub struct StartTimerInput {
    pub entity_type: String,
    pub entity_id: i64,
    pub stage: String,
    pub allocated_time_ms: Option<i64>,
    pub timer_config: Option<TimerConfig>,
    pub deadline_at: Option<DateTime<Utc>>,
    pub assigned_user_id: Option<i64>,
    pub assigned_role: Option<String>,
    pub workflow_code: Option<String>,
    pub step_order: Option<u32>,
    pub user_id: Option<i64>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct TimerActionInput {
    pub entity_type: String,
    pub entity_id: i64,
    pub stage: String,
    pub user_id: Option<i64>,
    pub reason: Option<String>,
}

/// Allocated time, by priority: explicit override, then the timer profile,
/// then the default.
pub fn resolve_allocated_time(input: &StartTimerInput, now: DateTime<Utc>) -> i64 {
    if let Some(ms) = input.allocated_time_ms {
        if ms > 0 {
            return ms;
        }
    }

    if let Some(config) = &input.timer_config {
        match config.timer_type {
            TimerType::FixedDuration | TimerType::Dynamic => {
                return hours_to_ms(config.duration_hours.unwrap_or(DEFAULT_TIMER_HOURS));
            }
            TimerType::DeadlineBased => {
                if let Some(deadline) = input.deadline_at {
                    return deadline.timestamp_millis() - now.timestamp_millis();
                }
            }
            TimerType::NegativeCountdown => {
                if let (Some(deadline), Some(offset)) =
                    (input.deadline_at, config.hours_before_deadline)
                {
                    let target = deadline.timestamp_millis() + hours_to_ms(offset);
                    return target - now.timestamp_millis();
                }
            }
            TimerType::NoTimer => return 0,
        }
    }

    hours_to_ms(DEFAULT_TIMER_HOURS)
}

pub struct TimerService<R: TimerRepository> {
    repo: Arc<R>,
}

impl<R: TimerRepository> TimerService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn start(&self, input: StartTimerInput) -> Result<TimerSnapshot, DomainError> {
        let existing = self
            .repo
            .find(&input.entity_type, input.entity_id, Some(&input.stage))
            .await?;

        match existing.as_ref().map(|t| t.status) {
            Some(TimerStatus::Running) => return Err(DomainError::TimerAlreadyRunning),
            Some(TimerStatus::Paused) => return Err(DomainError::TimerPaused),
            _ => {}
        }

        let now = Utc::now();
        let allocated_time_ms = resolve_allocated_time(&input, now);
        if allocated_time_ms <= 0 {
            return Err(DomainError::NonPositiveDuration);
        }

        let deadline = input
            .deadline_at
            .unwrap_or(now + Duration::milliseconds(allocated_time_ms));

        let metadata = self.build_metadata(&input, existing.as_ref());

        let tracker = TimerTracker {
            id: existing.as_ref().map(|t| t.id).unwrap_or_default(),
            entity_type: input.entity_type.clone(),
            entity_id: input.entity_id,
            stage: input.stage.clone(),
            status: TimerStatus::Running,
            allocated_time_ms,
            started_at: Some(now),
            ended_at: None,
            paused_at: None,
            deadline_at: Some(deadline),
            total_paused_duration_ms: 0,
            total_extension_ms: 0,
            assigned_user_id: input.assigned_user_id,
            created_by_user_id: input.user_id,
            metadata,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repo.upsert_started(&tracker).await?;

        self.log_event(
            saved.id,
            TimerEventType::Started,
            existing.map(|t| t.status),
            TimerStatus::Running,
            input.user_id,
            None,
            None,
        )
        .await?;

        info!(
            entity = %saved.entity_type,
            entity_id = saved.entity_id,
            stage = %saved.stage,
            allocated_time_ms,
            "timer started"
        );

        Ok(saved.snapshot(now))
    }

    pub async fn stop(&self, input: TimerActionInput) -> Result<TimerSnapshot, DomainError> {
        let mut timer = self.get_or_fail(&input).await?;

        if timer.status.is_final() {
            return Err(DomainError::TimerStateConflict {
                action: "stop",
                status: timer.status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        let previous = timer.status;

        // Fold an in-flight pause into the running total.
        if timer.status == TimerStatus::Paused {
            if let Some(paused_at) = timer.paused_at {
                timer.total_paused_duration_ms +=
                    now.timestamp_millis() - paused_at.timestamp_millis();
            }
        }

        timer.status = TimerStatus::Completed;
        timer.ended_at = Some(now);
        timer.paused_at = None;
        timer.updated_at = now;

        let updated = self.repo.update(&timer).await?;
        self.log_event(
            updated.id,
            TimerEventType::Stopped,
            Some(previous),
            TimerStatus::Completed,
            input.user_id,
            input.reason,
            None,
        )
        .await?;

        Ok(updated.snapshot(now))
    }

    pub async fn pause(&self, input: TimerActionInput) -> Result<TimerSnapshot, DomainError> {
        let mut timer = self.get_or_fail(&input).await?;

        if timer.status != TimerStatus::Running {
            return Err(DomainError::TimerStateConflict {
                action: "pause",
                status: timer.status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        timer.status = TimerStatus::Paused;
        timer.paused_at = Some(now);
        timer.updated_at = now;

        let updated = self.repo.update(&timer).await?;
        self.log_event(
            updated.id,
            TimerEventType::Paused,
            Some(TimerStatus::Running),
            TimerStatus::Paused,
            input.user_id,
            input.reason,
            None,
        )
        .await?;

        Ok(updated.snapshot(now))
    }

    pub async fn resume(&self, input: TimerActionInput) -> Result<TimerSnapshot, DomainError> {
        let mut timer = self.get_or_fail(&input).await?;

        if timer.status != TimerStatus::Paused {
            return Err(DomainError::TimerStateConflict {
                action: "resume",
                status: timer.status.as_str().to_string(),
            });
        }
        let paused_at = timer.paused_at.ok_or_else(|| {
            DomainError::InternalError("paused timer has no pause timestamp".into())
        })?;

        let now = Utc::now();
        let pause_duration = now.timestamp_millis() - paused_at.timestamp_millis();

        timer.status = TimerStatus::Running;
        timer.paused_at = None;
        timer.total_paused_duration_ms += pause_duration;
        // The deadline slides by however long the timer sat paused.
        timer.deadline_at = timer
            .deadline_at
            .map(|d| d + Duration::milliseconds(pause_duration));
        timer.updated_at = now;

        let updated = self.repo.update(&timer).await?;
        self.log_event(
            updated.id,
            TimerEventType::Resumed,
            Some(TimerStatus::Paused),
            TimerStatus::Running,
            input.user_id,
            input.reason,
            Some(pause_duration),
        )
        .await?;

        Ok(updated.snapshot(now))
    }

    pub async fn cancel(&self, input: TimerActionInput) -> Result<TimerSnapshot, DomainError> {
        let mut timer = self.get_or_fail(&input).await?;

        if timer.status.is_final() {
            return Err(DomainError::TimerStateConflict {
                action: "cancel",
                status: timer.status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        let previous = timer.status;
        timer.status = TimerStatus::Cancelled;
        timer.ended_at = Some(now);
        timer.paused_at = None;
        timer.updated_at = now;

        let updated = self.repo.update(&timer).await?;
        self.log_event(
            updated.id,
            TimerEventType::Cancelled,
            Some(previous),
            TimerStatus::Cancelled,
            input.user_id,
            input.reason.or_else(|| Some("Cancelled".to_string())),
            None,
        )
        .await?;

        Ok(updated.snapshot(now))
    }

    pub async fn extend(
        &self,
        input: TimerActionInput,
        extension_ms: i64,
    ) -> Result<TimerSnapshot, DomainError> {
        if extension_ms <= 0 {
            return Err(DomainError::NonPositiveDuration);
        }

        let mut timer = self.get_or_fail(&input).await?;
        if timer.status.is_final() {
            return Err(DomainError::TimerStateConflict {
                action: "extend",
                status: timer.status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        let previous = timer.status;
        timer.total_extension_ms += extension_ms;
        timer.deadline_at = timer
            .deadline_at
            .map(|d| d + Duration::milliseconds(extension_ms));
        timer.updated_at = now;

        let updated = self.repo.update(&timer).await?;
        self.log_event(
            updated.id,
            TimerEventType::Extended,
            Some(previous),
            previous,
            input.user_id,
            input.reason,
            Some(extension_ms),
        )
        .await?;

        Ok(updated.snapshot(now))
    }

    pub async fn get(
        &self,
        entity_type: &str,
        entity_id: i64,
        stage: Option<&str>,
    ) -> Result<Option<TimerSnapshot>, DomainError> {
        let now = Utc::now();
        Ok(self
            .repo
            .find(entity_type, entity_id, stage)
            .await?
            .map(|t| t.snapshot(now)))
    }

    pub async fn list(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<TimerSnapshot>, DomainError> {
        let now = Utc::now();
        Ok(self
            .repo
            .list(entity_type, entity_id)
            .await?
            .into_iter()
            .map(|t| t.snapshot(now))
            .collect())
    }

    pub async fn list_active(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<TimerSnapshot>, DomainError> {
        let now = Utc::now();
        Ok(self
            .repo
            .list_active(entity_type, entity_id)
            .await?
            .into_iter()
            .map(|t| t.snapshot(now))
            .collect())
    }

    pub async fn events(
        &self,
        entity_type: &str,
        entity_id: i64,
        stage: &str,
    ) -> Result<Vec<TimerEvent>, DomainError> {
        let timer = self
            .repo
            .find(entity_type, entity_id, Some(stage))
            .await?
            .ok_or_else(|| DomainError::TimerNotFound {
                entity_type: entity_type.to_string(),
                entity_id,
                stage: stage.to_string(),
            })?;
        self.repo.events(timer.id).await
    }

    fn build_metadata(&self, input: &StartTimerInput, existing: Option<&TimerTracker>) -> Value {
        let config = input.timer_config;
        let mut metadata = existing
            .map(|t| t.metadata.clone())
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();

        if let Some(extra) = input.metadata.as_ref().and_then(Value::as_object) {
            for (k, v) in extra {
                metadata.insert(k.clone(), v.clone());
            }
        }

        let timer_type = config.map(|c| c.timer_type).unwrap_or(TimerType::FixedDuration);
        metadata.insert("timer_type".into(), serde_json::to_value(timer_type).unwrap_or(Value::Null));
        if let Some(role) = &input.assigned_role {
            metadata.insert("assigned_role".into(), json!(role));
        }
        if let Some(code) = &input.workflow_code {
            metadata.insert("workflow_code".into(), json!(code));
        }
        if let Some(order) = input.step_order {
            metadata.insert("step_order".into(), json!(order));
        }
        metadata.insert(
            "warning_threshold".into(),
            json!(config.map(|c| c.warning_threshold).unwrap_or(DEFAULT_WARNING_THRESHOLD)),
        );
        metadata.insert(
            "critical_threshold".into(),
            json!(config.map(|c| c.critical_threshold).unwrap_or(DEFAULT_CRITICAL_THRESHOLD)),
        );

        Value::Object(metadata)
    }

    async fn get_or_fail(&self, input: &TimerActionInput) -> Result<TimerTracker, DomainError> {
        self.repo
            .find(&input.entity_type, input.entity_id, Some(&input.stage))
            .await?
            .ok_or_else(|| DomainError::TimerNotFound {
                entity_type: input.entity_type.clone(),
                entity_id: input.entity_id,
                stage: input.stage.clone(),
            })
    }

    #[allow(clippy::too_many_arguments)]
    async fn log_event(
        &self,
        tracker_id: i64,
        event_type: TimerEventType,
        previous: Option<TimerStatus>,
        new_status: TimerStatus,
        user_id: Option<i64>,
        reason: Option<String>,
        duration_change_ms: Option<i64>,
    ) -> Result<(), DomainError> {
        self.repo
            .log_event(&NewTimerEvent {
                tracker_id,
                event_type,
                previous_status: previous.map(|s| s.as_str().to_string()),
                new_status: new_status.as_str().to_string(),
                performed_by_user_id: user_id,
                reason,
                duration_change_ms,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::timer_repository::MockTimerRepository;
    use chrono::TimeZone;

    fn action(stage: &str) -> TimerActionInput {
        TimerActionInput {
            entity_type: "TENDER".into(),
            entity_id: 3,
            stage: stage.into(),
            user_id: Some(1),
            reason: None,
        }
    }

    fn tracker(status: TimerStatus) -> TimerTracker {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        TimerTracker {
            id: 11,
            entity_type: "TENDER".into(),
            entity_id: 3,
            stage: "tender_info".into(),
            status,
            allocated_time_ms: hours_to_ms(72),
            started_at: Some(t0),
            ended_at: None,
            paused_at: if status == TimerStatus::Paused { Some(t0) } else { None },
            deadline_at: Some(t0 + Duration::hours(72)),
            total_paused_duration_ms: 0,
            total_extension_ms: 0,
            assigned_user_id: None,
            created_by_user_id: Some(1),
            metadata: json!({}),
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn allocation_prefers_explicit_override() {
        let now = Utc::now();
        let input = StartTimerInput {
            allocated_time_ms: Some(5_000),
            timer_config: Some(TimerConfig::fixed(72, true)),
            ..Default::default()
        };
        assert_eq!(resolve_allocated_time(&input, now), 5_000);
    }

    #[test]
    fn allocation_from_fixed_duration_profile() {
        let now = Utc::now();
        let input = StartTimerInput {
            timer_config: Some(TimerConfig::fixed(48, true)),
            ..Default::default()
        };
        assert_eq!(resolve_allocated_time(&input, now), hours_to_ms(48));
    }

    #[test]
    fn allocation_counts_down_to_deadline() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let input = StartTimerInput {
            timer_config: Some(TimerConfig::deadline_based()),
            deadline_at: Some(now + Duration::hours(10)),
            ..Default::default()
        };
        assert_eq!(resolve_allocated_time(&input, now), hours_to_ms(10));
    }

    #[test]
    fn allocation_offsets_before_deadline() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let input = StartTimerInput {
            timer_config: Some(TimerConfig::before_deadline(-72)),
            deadline_at: Some(now + Duration::hours(100)),
            ..Default::default()
        };
        assert_eq!(resolve_allocated_time(&input, now), hours_to_ms(28));
    }

    #[test]
    fn allocation_defaults_to_a_day() {
        let input = StartTimerInput::default();
        assert_eq!(resolve_allocated_time(&input, Utc::now()), hours_to_ms(24));
    }

    #[tokio::test]
    async fn start_refuses_running_timer() {
        let mut repo = MockTimerRepository::new();
        repo.expect_find()
            .returning(|_, _, _| Ok(Some(tracker(TimerStatus::Running))));

        let svc = TimerService::new(Arc::new(repo));
        let err = svc
            .start(StartTimerInput {
                entity_type: "TENDER".into(),
                entity_id: 3,
                stage: "tender_info".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TimerAlreadyRunning));
    }

    #[tokio::test]
    async fn start_upserts_and_logs() {
        let mut repo = MockTimerRepository::new();
        repo.expect_find().returning(|_, _, _| Ok(None));
        repo.expect_upsert_started()
            .withf(|t| t.status == TimerStatus::Running && t.allocated_time_ms == hours_to_ms(24))
            .returning(|t| {
                let mut saved = t.clone();
                saved.id = 11;
                Ok(saved)
            });
        repo.expect_log_event()
            .withf(|e| e.event_type == TimerEventType::Started && e.previous_status.is_none())
            .returning(|_| Ok(()));

        let svc = TimerService::new(Arc::new(repo));
        let snap = svc
            .start(StartTimerInput {
                entity_type: "TENDER".into(),
                entity_id: 3,
                stage: "tender_approval".into(),
                timer_config: Some(TimerConfig::fixed(24, true)),
                user_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(snap.status, TimerStatus::Running);
        assert_eq!(snap.allocated_time_ms, hours_to_ms(24));
    }

    #[tokio::test]
    async fn pause_requires_running() {
        let mut repo = MockTimerRepository::new();
        repo.expect_find()
            .returning(|_, _, _| Ok(Some(tracker(TimerStatus::Completed))));

        let svc = TimerService::new(Arc::new(repo));
        let err = svc.pause(action("tender_info")).await.unwrap_err();
        assert!(matches!(err, DomainError::TimerStateConflict { action: "pause", .. }));
    }

    #[tokio::test]
    async fn resume_slides_deadline_by_pause_duration() {
        let mut repo = MockTimerRepository::new();
        repo.expect_find()
            .returning(|_, _, _| Ok(Some(tracker(TimerStatus::Paused))));
        repo.expect_update()
            .withf(|t| {
                t.status == TimerStatus::Running
                    && t.paused_at.is_none()
                    && t.total_paused_duration_ms > 0
            })
            .returning(|t| Ok(t.clone()));
        repo.expect_log_event()
            .withf(|e| e.event_type == TimerEventType::Resumed && e.duration_change_ms.is_some())
            .returning(|_| Ok(()));

        let svc = TimerService::new(Arc::new(repo));
        let snap = svc.resume(action("tender_info")).await.unwrap();
        assert_eq!(snap.status, TimerStatus::Running);
    }

    #[tokio::test]
    async fn extend_rejects_non_positive() {
        let repo = MockTimerRepository::new();
        let svc = TimerService::new(Arc::new(repo));
        let err = svc.extend(action("tender_info"), 0).await.unwrap_err();
        assert!(matches!(err, DomainError::NonPositiveDuration));
    }

    #[tokio::test]
    async fn stop_folds_open_pause_into_total() {
        let mut repo = MockTimerRepository::new();
        repo.expect_find()
            .returning(|_, _, _| Ok(Some(tracker(TimerStatus::Paused))));
        repo.expect_update()
            .withf(|t| {
                t.status == TimerStatus::Completed
                    && t.ended_at.is_some()
                    && t.total_paused_duration_ms > 0
            })
            .returning(|t| Ok(t.clone()));
        repo.expect_log_event().returning(|_| Ok(()));

        let svc = TimerService::new(Arc::new(repo));
        let snap = svc.stop(action("tender_info")).await.unwrap();
        assert_eq!(snap.status, TimerStatus::Completed);
    }
}
