//! PostgreSQL timer repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::error;

use tms_core::domain::{TimerEvent, TimerStatus, TimerTracker};
use tms_core::error::DomainError;
use tms_core::repositories::{NewTimerEvent, TimerRepository};

pub struct PgTimerRepository {
    pool: PgPool,
}

impl PgTimerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct TrackerRow {
    id: i64,
    entity_type: String,
    entity_id: i64,
    stage: String,
    status: String,
    allocated_time_ms: i64,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    deadline_at: Option<DateTime<Utc>>,
    total_paused_duration_ms: i64,
    total_extension_ms: i64,
    assigned_user_id: Option<i64>,
    created_by_user_id: Option<i64>,
    metadata: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TrackerRow> for TimerTracker {
    type Error = DomainError;

    fn try_from(row: TrackerRow) -> Result<Self, Self::Error> {
        let status = TimerStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::InternalError(format!("unknown timer status {}", row.status))
        })?;
        Ok(TimerTracker {
            id: row.id,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            stage: row.stage,
            status,
            allocated_time_ms: row.allocated_time_ms,
            started_at: row.started_at,
            ended_at: row.ended_at,
            paused_at: row.paused_at,
            deadline_at: row.deadline_at,
            total_paused_duration_ms: row.total_paused_duration_ms,
            total_extension_ms: row.total_extension_ms,
            assigned_user_id: row.assigned_user_id,
            created_by_user_id: row.created_by_user_id,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    tracker_id: i64,
    event_type: String,
    previous_status: Option<String>,
    new_status: String,
    performed_by_user_id: Option<i64>,
    reason: Option<String>,
    duration_change_ms: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for TimerEvent {
    fn from(row: EventRow) -> Self {
        TimerEvent {
            id: row.id,
            tracker_id: row.tracker_id,
            event_type: row.event_type,
            previous_status: row.previous_status,
            new_status: row.new_status,
            performed_by_user_id: row.performed_by_user_id,
            reason: row.reason,
            duration_change_ms: row.duration_change_ms,
            created_at: row.created_at,
        }
    }
}

const TRACKER_COLUMNS: &str = "id, entity_type, entity_id, stage, status, allocated_time_ms, \
                               started_at, ended_at, paused_at, deadline_at, \
                               total_paused_duration_ms, total_extension_ms, assigned_user_id, \
                               created_by_user_id, metadata, created_at, updated_at";

#[async_trait]
impl TimerRepository for PgTimerRepository {
    async fn find<'a>(
        &self,
        entity_type: &str,
        entity_id: i64,
        stage: Option<&'a str>,
    ) -> Result<Option<TimerTracker>, DomainError> {
        let row: Option<TrackerRow> = match stage {
            Some(stage) => {
                sqlx::query_as(&format!(
                    "SELECT {TRACKER_COLUMNS} FROM timer_trackers \
                     WHERE entity_type = $1 AND entity_id = $2 AND stage = $3"
                ))
                .bind(entity_type)
                .bind(entity_id)
                .bind(stage)
                .fetch_optional(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {TRACKER_COLUMNS} FROM timer_trackers \
                     WHERE entity_type = $1 AND entity_id = $2 LIMIT 1"
                ))
                .bind(entity_type)
                .bind(entity_id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(|e| db_err("finding timer", e))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<TimerTracker>, DomainError> {
        let rows: Vec<TrackerRow> = sqlx::query_as(&format!(
            "SELECT {TRACKER_COLUMNS} FROM timer_trackers \
             WHERE entity_type = $1 AND entity_id = $2 ORDER BY created_at"
        ))
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing timers", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_active(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<TimerTracker>, DomainError> {
        let rows: Vec<TrackerRow> = sqlx::query_as(&format!(
            "SELECT {TRACKER_COLUMNS} FROM timer_trackers \
             WHERE entity_type = $1 AND entity_id = $2 AND status IN ('running', 'paused') \
             ORDER BY created_at"
        ))
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing active timers", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn upsert_started(&self, tracker: &TimerTracker) -> Result<TimerTracker, DomainError> {
        let row: TrackerRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO timer_trackers
                (entity_type, entity_id, stage, status, allocated_time_ms, started_at,
                 deadline_at, total_paused_duration_ms, total_extension_ms, assigned_user_id,
                 created_by_user_id, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 0, $8, $9, $10)
            ON CONFLICT (entity_type, entity_id, stage) DO UPDATE SET
                status = EXCLUDED.status,
                allocated_time_ms = EXCLUDED.allocated_time_ms,
                started_at = EXCLUDED.started_at,
                deadline_at = EXCLUDED.deadline_at,
                ended_at = NULL,
                paused_at = NULL,
                total_paused_duration_ms = 0,
                total_extension_ms = 0,
                assigned_user_id = EXCLUDED.assigned_user_id,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            RETURNING {TRACKER_COLUMNS}
            "#
        ))
        .bind(&tracker.entity_type)
        .bind(tracker.entity_id)
        .bind(&tracker.stage)
        .bind(tracker.status.as_str())
        .bind(tracker.allocated_time_ms)
        .bind(tracker.started_at)
        .bind(tracker.deadline_at)
        .bind(tracker.assigned_user_id)
        .bind(tracker.created_by_user_id)
        .bind(&tracker.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("starting timer", e))?;

        row.try_into()
    }

    async fn update(&self, tracker: &TimerTracker) -> Result<TimerTracker, DomainError> {
        let row: TrackerRow = sqlx::query_as(&format!(
            r#"
            UPDATE timer_trackers SET
                status = $2,
                allocated_time_ms = $3,
                started_at = $4,
                ended_at = $5,
                paused_at = $6,
                deadline_at = $7,
                total_paused_duration_ms = $8,
                total_extension_ms = $9,
                assigned_user_id = $10,
                metadata = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TRACKER_COLUMNS}
            "#
        ))
        .bind(tracker.id)
        .bind(tracker.status.as_str())
        .bind(tracker.allocated_time_ms)
        .bind(tracker.started_at)
        .bind(tracker.ended_at)
        .bind(tracker.paused_at)
        .bind(tracker.deadline_at)
        .bind(tracker.total_paused_duration_ms)
        .bind(tracker.total_extension_ms)
        .bind(tracker.assigned_user_id)
        .bind(&tracker.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("updating timer", e))?;

        row.try_into()
    }

    async fn log_event(&self, event: &NewTimerEvent) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO timer_events
                (tracker_id, event_type, previous_status, new_status, performed_by_user_id,
                 reason, duration_change_ms)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.tracker_id)
        .bind(event.event_type.as_str())
        .bind(&event.previous_status)
        .bind(&event.new_status)
        .bind(event.performed_by_user_id)
        .bind(&event.reason)
        .bind(event.duration_change_ms)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("logging timer event", e))?;
        Ok(())
    }

    async fn events(&self, tracker_id: i64) -> Result<Vec<TimerEvent>, DomainError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT id, tracker_id, event_type, previous_status, new_status,
                   performed_by_user_id, reason, duration_change_ms, created_at
            FROM timer_events
            WHERE tracker_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(tracker_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing timer events", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
