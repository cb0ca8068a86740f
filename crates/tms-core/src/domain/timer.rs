//! Stage timers
//!
//! One tracker per (entity type, entity id, stage). All wall-clock math lives
//! in [`TimerTracker::snapshot`] so it can be computed for any `now`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tms_shared::constants::{DEFAULT_CRITICAL_THRESHOLD, DEFAULT_WARNING_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
            TimerStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "running" => Some(TimerStatus::Running),
            "paused" => Some(TimerStatus::Paused),
            "completed" => Some(TimerStatus::Completed),
            "cancelled" => Some(TimerStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, TimerStatus::Completed | TimerStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerType {
    FixedDuration,
    DeadlineBased,
    NegativeCountdown,
    Dynamic,
    NoTimer,
}

/// Per-step timer parameters from the workflow definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(rename = "type")]
    pub timer_type: TimerType,
    #[serde(default)]
    pub duration_hours: Option<i64>,
    /// Negative offset relative to the entity deadline, e.g. -72.
    #[serde(default)]
    pub hours_before_deadline: Option<i64>,
    #[serde(default)]
    pub business_days_only: bool,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: u8,
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: u8,
}

fn default_warning_threshold() -> u8 {
    DEFAULT_WARNING_THRESHOLD
}

fn default_critical_threshold() -> u8 {
    DEFAULT_CRITICAL_THRESHOLD
}

impl TimerConfig {
    pub const fn no_timer() -> Self {
        Self {
            timer_type: TimerType::NoTimer,
            duration_hours: None,
            hours_before_deadline: None,
            business_days_only: false,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }

    pub const fn fixed(hours: i64, business_days_only: bool) -> Self {
        Self {
            timer_type: TimerType::FixedDuration,
            duration_hours: Some(hours),
            hours_before_deadline: None,
            business_days_only,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }

    pub const fn deadline_based() -> Self {
        Self {
            timer_type: TimerType::DeadlineBased,
            duration_hours: None,
            hours_before_deadline: None,
            business_days_only: false,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }

    pub const fn before_deadline(hours: i64) -> Self {
        Self {
            timer_type: TimerType::NegativeCountdown,
            duration_hours: None,
            hours_before_deadline: Some(hours),
            business_days_only: false,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }

    pub const fn dynamic(business_days_only: bool) -> Self {
        Self {
            timer_type: TimerType::Dynamic,
            duration_hours: None,
            hours_before_deadline: None,
            business_days_only,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerTracker {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub stage: String,
    pub status: TimerStatus,
    pub allocated_time_ms: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub deadline_at: Option<DateTime<Utc>>,
    pub total_paused_duration_ms: i64,
    pub total_extension_ms: i64,
    pub assigned_user_id: Option<i64>,
    pub created_by_user_id: Option<i64>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerEventType {
    Started,
    Stopped,
    Paused,
    Resumed,
    Extended,
    Cancelled,
}

impl TimerEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerEventType::Started => "started",
            TimerEventType::Stopped => "stopped",
            TimerEventType::Paused => "paused",
            TimerEventType::Resumed => "resumed",
            TimerEventType::Extended => "extended",
            TimerEventType::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerEvent {
    pub id: i64,
    pub tracker_id: i64,
    pub event_type: String,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub performed_by_user_id: Option<i64>,
    pub reason: Option<String>,
    pub duration_change_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Tracker plus everything derived from the clock.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub stage: String,
    pub status: TimerStatus,
    pub allocated_time_ms: i64,
    pub total_extension_ms: i64,
    pub total_paused_duration_ms: i64,
    pub effective_allocated_time_ms: i64,
    pub elapsed_time_ms: i64,
    pub remaining_time_ms: i64,
    pub progress_percent: u8,
    pub warning_threshold: u8,
    pub critical_threshold: u8,
    pub is_warning: bool,
    pub is_critical: bool,
    pub is_overdue: bool,
    pub display_text: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub deadline_at: Option<DateTime<Utc>>,
    pub assigned_user_id: Option<i64>,
    pub metadata: Value,
}

impl TimerTracker {
    pub fn snapshot(&self, now: DateTime<Utc>) -> TimerSnapshot {
        let now_ms = now.timestamp_millis();
        let effective_allocated = self.allocated_time_ms + self.total_extension_ms;

        let current_pause_ms = match (self.status, self.paused_at) {
            (TimerStatus::Paused, Some(paused_at)) => now_ms - paused_at.timestamp_millis(),
            _ => 0,
        };

        let mut elapsed_ms = match self.started_at {
            Some(started_at) => {
                now_ms
                    - started_at.timestamp_millis()
                    - self.total_paused_duration_ms
                    - current_pause_ms
            }
            None => 0,
        };

        let remaining_ms = if self.status.is_final() {
            if let (Some(started_at), Some(ended_at)) = (self.started_at, self.ended_at) {
                elapsed_ms = ended_at.timestamp_millis()
                    - started_at.timestamp_millis()
                    - self.total_paused_duration_ms;
            }
            match (self.deadline_at, self.ended_at) {
                (Some(deadline_at), Some(ended_at)) => {
                    let diff = deadline_at.timestamp_millis() - ended_at.timestamp_millis();
                    // A deadline stamped equal to the end time carries no
                    // information; fall back to the allocation.
                    if diff.abs() < 1000 && self.started_at.is_some() {
                        effective_allocated - elapsed_ms
                    } else {
                        diff
                    }
                }
                _ => {
                    if self.started_at.is_some() && self.ended_at.is_some() {
                        effective_allocated - elapsed_ms
                    } else {
                        0
                    }
                }
            }
        } else if let Some(deadline_at) = self.deadline_at {
            // Deadline already slides on resume; credit an in-flight pause.
            (deadline_at.timestamp_millis() - now_ms + current_pause_ms).max(0)
        } else if self.started_at.is_some() {
            (effective_allocated - elapsed_ms).max(0)
        } else {
            effective_allocated
        };

        let progress_percent = if effective_allocated > 0 {
            (((elapsed_ms as f64 / effective_allocated as f64) * 100.0).round() as i64)
                .clamp(0, 100) as u8
        } else {
            0
        };

        let warning_threshold = self
            .metadata
            .get("warning_threshold")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_WARNING_THRESHOLD as u64) as u8;
        let critical_threshold = self
            .metadata
            .get("critical_threshold")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_CRITICAL_THRESHOLD as u64) as u8;

        let is_overdue = self.status == TimerStatus::Running && remaining_ms <= 0;
        let display_text = match self.status {
            TimerStatus::Completed => "completed".to_string(),
            TimerStatus::Cancelled => "cancelled".to_string(),
            _ if is_overdue => {
                format!("{} overdue", tms_shared::utils::format_duration_ms(remaining_ms))
            }
            _ => format!("{} remaining", tms_shared::utils::format_duration_ms(remaining_ms)),
        };

        TimerSnapshot {
            id: self.id,
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id,
            stage: self.stage.clone(),
            status: self.status,
            allocated_time_ms: self.allocated_time_ms,
            total_extension_ms: self.total_extension_ms,
            total_paused_duration_ms: self.total_paused_duration_ms,
            effective_allocated_time_ms: effective_allocated,
            elapsed_time_ms: elapsed_ms,
            remaining_time_ms: remaining_ms,
            progress_percent,
            warning_threshold,
            critical_threshold,
            is_warning: progress_percent >= warning_threshold
                && progress_percent < critical_threshold,
            is_critical: progress_percent >= critical_threshold,
            is_overdue,
            display_text,
            started_at: self.started_at,
            ended_at: self.ended_at,
            paused_at: self.paused_at,
            deadline_at: self.deadline_at,
            assigned_user_id: self.assigned_user_id,
            metadata: self.metadata.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn tracker(status: TimerStatus) -> TimerTracker {
        TimerTracker {
            id: 1,
            entity_type: "TENDER".into(),
            entity_id: 10,
            stage: "tender_info".into(),
            status,
            allocated_time_ms: 3_600_000,
            started_at: Some(at(0)),
            ended_at: None,
            paused_at: None,
            deadline_at: Some(at(3600)),
            total_paused_duration_ms: 0,
            total_extension_ms: 0,
            assigned_user_id: None,
            created_by_user_id: None,
            metadata: json!({}),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    #[test]
    fn running_timer_counts_down_toward_deadline() {
        let snap = tracker(TimerStatus::Running).snapshot(at(1800));
        assert_eq!(snap.elapsed_time_ms, 1_800_000);
        assert_eq!(snap.remaining_time_ms, 1_800_000);
        assert_eq!(snap.progress_percent, 50);
        assert!(!snap.is_warning);
        assert!(!snap.is_overdue);
    }

    #[test]
    fn in_flight_pause_is_excluded_from_elapsed() {
        let mut t = tracker(TimerStatus::Paused);
        t.paused_at = Some(at(1000));
        let snap = t.snapshot(at(2000));
        assert_eq!(snap.elapsed_time_ms, 1_000_000);
        // Pause credit keeps the remaining time frozen.
        assert_eq!(snap.remaining_time_ms, 2_600_000);
    }

    #[test]
    fn past_deadline_is_overdue_and_critical() {
        let snap = tracker(TimerStatus::Running).snapshot(at(4000));
        assert!(snap.is_overdue);
        assert!(snap.is_critical);
        assert_eq!(snap.progress_percent, 100);
        assert_eq!(snap.remaining_time_ms, 0);
    }

    #[test]
    fn warning_threshold_from_metadata() {
        let mut t = tracker(TimerStatus::Running);
        t.metadata = json!({ "warning_threshold": 40, "critical_threshold": 90 });
        let snap = t.snapshot(at(1800));
        assert!(snap.is_warning);
        assert!(!snap.is_critical);
    }

    #[test]
    fn completed_timer_keeps_margin_to_deadline() {
        let mut t = tracker(TimerStatus::Completed);
        t.ended_at = Some(at(3000));
        let snap = t.snapshot(at(9999));
        assert_eq!(snap.elapsed_time_ms, 3_000_000);
        assert_eq!(snap.remaining_time_ms, 600_000);
    }

    #[test]
    fn completed_timer_with_stamped_deadline_falls_back_to_allocation() {
        let mut t = tracker(TimerStatus::Completed);
        t.ended_at = Some(at(3000));
        t.deadline_at = Some(at(3000));
        let snap = t.snapshot(at(9999));
        assert_eq!(snap.remaining_time_ms, 600_000);
    }

    #[test]
    fn extension_stretches_the_allocation() {
        let mut t = tracker(TimerStatus::Running);
        t.total_extension_ms = 1_800_000;
        t.deadline_at = Some(at(5400));
        let snap = t.snapshot(at(1800));
        assert_eq!(snap.effective_allocated_time_ms, 5_400_000);
        assert_eq!(snap.progress_percent, 33);
    }
}
