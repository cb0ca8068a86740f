//! Workflow instantiation
//!
//! Starts stage timers for the steps of a workflow as their dependencies
//! complete. Steps whose entry condition fails are left out entirely; steps
//! without a timer profile are milestones and never get a tracker row.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use tms_shared::utils::hours_to_ms;

use crate::domain::{TimerSnapshot, TimerStatus, TimerType};
use crate::error::DomainError;
use crate::repositories::{CalendarRepository, TimerRepository};
use crate::services::business_calendar::BusinessCalendarService;
use crate::services::timer_service::{StartTimerInput, TimerService};
use crate::workflow::{workflow, WorkflowDefinition, WorkflowStep};

pub struct WorkflowService<R: TimerRepository, C: CalendarRepository> {
    timers: Arc<TimerService<R>>,
    calendar: Arc<BusinessCalendarService<C>>,
}

#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub entity_id: i64,
    /// JSON view of the owning entity, fed to step conditionals.
    pub entity: Value,
    pub deadline_at: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
}

impl<R: TimerRepository, C: CalendarRepository> WorkflowService<R, C> {
    pub fn new(timers: Arc<TimerService<R>>, calendar: Arc<BusinessCalendarService<C>>) -> Self {
        Self { timers, calendar }
    }

    /// Kick off a workflow: every applicable step whose dependencies are
    /// already satisfied gets a running timer.
    pub async fn instantiate(
        &self,
        code: &str,
        ctx: &WorkflowContext,
    ) -> Result<Vec<TimerSnapshot>, DomainError> {
        let definition =
            workflow(code).ok_or_else(|| DomainError::WorkflowNotFound(code.to_string()))?;
        self.start_ready_steps(definition, ctx, &HashSet::new()).await
    }

    /// Mark `step_key` complete (stopping its timer if it has one) and start
    /// every step that just became ready.
    pub async fn complete_step(
        &self,
        code: &str,
        step_key: &str,
        ctx: &WorkflowContext,
    ) -> Result<Vec<TimerSnapshot>, DomainError> {
        let definition =
            workflow(code).ok_or_else(|| DomainError::WorkflowNotFound(code.to_string()))?;
        let entity_type = definition.entity_type.as_str();

        let step = definition
            .step(step_key)
            .ok_or_else(|| DomainError::WorkflowNotFound(format!("{code}:{step_key}")))?;

        if step.timer_config.timer_type != TimerType::NoTimer {
            // Milestone steps have no tracker; a missing one elsewhere means
            // the step never started, which stop() reports.
            self.timers
                .stop(super::timer_service::TimerActionInput {
                    entity_type: entity_type.to_string(),
                    entity_id: ctx.entity_id,
                    stage: step_key.to_string(),
                    user_id: ctx.user_id,
                    reason: Some("step completed".to_string()),
                })
                .await?;
        }

        let mut completed = self.completed_steps(entity_type, ctx.entity_id).await?;
        completed.insert(step_key.to_string());

        self.start_ready_steps(definition, ctx, &completed).await
    }

    async fn start_ready_steps(
        &self,
        definition: &'static WorkflowDefinition,
        ctx: &WorkflowContext,
        completed: &HashSet<String>,
    ) -> Result<Vec<TimerSnapshot>, DomainError> {
        let entity_type = definition.entity_type.as_str();

        let eligible: Vec<&WorkflowStep> = definition
            .steps
            .iter()
            .filter(|step| step.applies_to(&ctx.entity))
            .collect();
        let eligible_keys: HashSet<&str> = eligible.iter().map(|s| s.step_key).collect();

        let existing: HashSet<String> = self
            .timers
            .list(entity_type, ctx.entity_id)
            .await?
            .into_iter()
            .map(|t| t.stage)
            .collect();

        let mut started = Vec::new();
        for step in eligible {
            if step.timer_config.timer_type == TimerType::NoTimer {
                continue;
            }
            if existing.contains(step.step_key) {
                continue;
            }
            // Dependencies outside this workflow's eligible set don't gate.
            let ready = step.depends_on.iter().all(|dep| {
                !eligible_keys.contains(dep) || completed.contains(*dep)
            });
            if !ready {
                continue;
            }

            // Business-day steps end when their working hours run out, not a
            // fixed wall-clock offset away.
            let deadline_at = match (step.timer_config.timer_type, step.timer_config.business_days_only) {
                (TimerType::FixedDuration, true) => {
                    let hours = step.timer_config.duration_hours.unwrap_or(0);
                    Some(
                        self.calendar
                            .add_business_ms(Utc::now(), hours_to_ms(hours))
                            .await?,
                    )
                }
                _ => ctx.deadline_at,
            };

            let snapshot = self
                .timers
                .start(StartTimerInput {
                    entity_type: entity_type.to_string(),
                    entity_id: ctx.entity_id,
                    stage: step.step_key.to_string(),
                    allocated_time_ms: None,
                    timer_config: Some(step.timer_config),
                    deadline_at,
                    assigned_user_id: None,
                    assigned_role: Some(step.assigned_role.to_string()),
                    workflow_code: Some(definition.code.to_string()),
                    step_order: Some(step.step_order),
                    user_id: ctx.user_id,
                    metadata: None,
                })
                .await?;
            started.push(snapshot);
        }

        if !started.is_empty() {
            info!(
                workflow = definition.code,
                entity_id = ctx.entity_id,
                steps = started.len(),
                "workflow steps started"
            );
        }

        Ok(started)
    }

    async fn completed_steps(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<HashSet<String>, DomainError> {
        Ok(self
            .timers
            .list(entity_type, entity_id)
            .await?
            .into_iter()
            .filter(|t| t.status == TimerStatus::Completed)
            .map(|t| t.stage)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimerTracker;
    use crate::repositories::calendar_repository::MockCalendarRepository;
    use crate::repositories::timer_repository::MockTimerRepository;
    use chrono::Duration;
    use serde_json::json;
    use std::sync::Mutex;

    fn ctx(entity: Value) -> WorkflowContext {
        WorkflowContext {
            entity_id: 21,
            entity,
            deadline_at: Some(Utc::now() + Duration::days(10)),
            user_id: Some(4),
        }
    }

    fn runner(
        repo: MockTimerRepository,
    ) -> WorkflowService<MockTimerRepository, MockCalendarRepository> {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo.expect_working_hours_value().returning(|| Ok(None));
        calendar_repo.expect_holidays_between().returning(|_, _| Ok(vec![]));
        WorkflowService::new(
            Arc::new(TimerService::new(Arc::new(repo))),
            Arc::new(BusinessCalendarService::new(Arc::new(calendar_repo))),
        )
    }

    #[tokio::test]
    async fn instantiate_starts_only_dependency_free_timed_steps() {
        let started: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let started_keys = started.clone();

        let mut repo = MockTimerRepository::new();
        repo.expect_list().returning(|_, _| Ok(vec![]));
        repo.expect_find().returning(|_, _, _| Ok(None));
        repo.expect_upsert_started().returning(move |t| {
            started_keys.lock().unwrap().push(t.stage.clone());
            let mut saved = t.clone();
            saved.id = 1;
            Ok(saved)
        });
        repo.expect_log_event().returning(|_| Ok(()));

        let svc = runner(repo);
        let snaps = svc
            .instantiate("TENDERING_WF", &ctx(json!({ "emd_required": false })))
            .await
            .unwrap();

        let keys = started.lock().unwrap().clone();
        // tender_info has no deps; tq_replied is deadline-based with no deps;
        // ra_approved / tender_result are milestones and get no tracker.
        assert!(keys.contains(&"tender_info".to_string()));
        assert!(keys.contains(&"tq_replied".to_string()));
        assert!(!keys.contains(&"tender_approval".to_string()));
        assert!(!keys.contains(&"emd_requested".to_string()));
        assert_eq!(snaps.len(), keys.len());
    }

    #[tokio::test]
    async fn completing_a_step_releases_its_dependents() {
        let now = Utc::now();
        let tracker = TimerTracker {
            id: 7,
            entity_type: "TENDER".into(),
            entity_id: 21,
            stage: "tender_info".into(),
            status: crate::domain::TimerStatus::Running,
            allocated_time_ms: 1000,
            started_at: Some(now),
            ended_at: None,
            paused_at: None,
            deadline_at: Some(now + Duration::hours(72)),
            total_paused_duration_ms: 0,
            total_extension_ms: 0,
            assigned_user_id: None,
            created_by_user_id: None,
            metadata: json!({}),
            created_at: now,
            updated_at: now,
        };

        let started: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let started_keys = started.clone();

        let mut repo = MockTimerRepository::new();
        {
            let tracker = tracker.clone();
            repo.expect_find()
                .returning(move |_, _, stage| match stage {
                    Some("tender_info") => Ok(Some(tracker.clone())),
                    _ => Ok(None),
                });
        }
        {
            let tracker = tracker.clone();
            repo.expect_update().returning(move |t| Ok(t.clone()));
            repo.expect_list().returning(move |_, _| {
                let mut done = tracker.clone();
                done.status = crate::domain::TimerStatus::Completed;
                done.ended_at = Some(Utc::now());
                Ok(vec![done])
            });
        }
        repo.expect_upsert_started().returning(move |t| {
            started_keys.lock().unwrap().push(t.stage.clone());
            let mut saved = t.clone();
            saved.id = 2;
            Ok(saved)
        });
        repo.expect_log_event().returning(|_| Ok(()));

        let svc = runner(repo);
        svc.complete_step("TENDERING_WF", "tender_info", &ctx(json!({ "emd_required": true })))
            .await
            .unwrap();

        let keys = started.lock().unwrap().clone();
        assert!(keys.contains(&"tender_approval".to_string()));
        // Downstream of tender_approval, still gated.
        assert!(!keys.contains(&"rfq_sent".to_string()));
    }

    #[tokio::test]
    async fn conditional_steps_join_once_their_flag_is_set() {
        let mut repo = MockTimerRepository::new();
        repo.expect_list().returning(|_, _| Ok(vec![]));
        repo.expect_find().returning(|_, _, _| Ok(None));
        let started: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let started_keys = started.clone();
        repo.expect_upsert_started().returning(move |t| {
            started_keys.lock().unwrap().push(t.stage.clone());
            let mut saved = t.clone();
            saved.id = 3;
            Ok(saved)
        });
        repo.expect_log_event().returning(|_| Ok(()));

        let svc = runner(repo);
        // DD accounts form is the only EMD step applying to a DD instrument,
        // and its external dependency does not gate.
        let snaps = svc
            .instantiate("EMD_WF", &ctx(json!({ "emd_type": "DD" })))
            .await
            .unwrap();
        assert_eq!(snaps.len(), 1);
        assert_eq!(started.lock().unwrap().as_slice(), &["dd_acc_form".to_string()]);
    }

    #[tokio::test]
    async fn unknown_workflow_code_errors() {
        let repo = MockTimerRepository::new();
        let svc = runner(repo);
        let err = svc.instantiate("NOPE_WF", &ctx(json!({}))).await.unwrap_err();
        assert!(matches!(err, DomainError::WorkflowNotFound(_)));
    }
}
