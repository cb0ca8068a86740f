//! Workflow handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use tms_core::domain::{CurrentUser, TimerSnapshot};
use tms_core::services::WorkflowContext;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InstantiateBody {
    pub entity_id: i64,
    /// JSON view of the entity, fed to step conditionals
    /// (e.g. `{ "emd_required": true }`).
    #[serde(default)]
    pub entity: Value,
    pub deadline_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteStepBody {
    pub entity_id: i64,
    #[serde(default)]
    pub entity: Value,
    pub deadline_at: Option<DateTime<Utc>>,
}

pub async fn instantiate(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<InstantiateBody>,
) -> Result<Json<ApiResponse<Vec<TimerSnapshot>>>, ApiError> {
    let started = state
        .workflows
        .instantiate(
            &code,
            &WorkflowContext {
                entity_id: payload.entity_id,
                entity: payload.entity,
                deadline_at: payload.deadline_at,
                user_id: Some(current_user.id),
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(started)))
}

pub async fn complete_step(
    State(state): State<AppState>,
    Path((code, step_key)): Path<(String, String)>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CompleteStepBody>,
) -> Result<Json<ApiResponse<Vec<TimerSnapshot>>>, ApiError> {
    let started = state
        .workflows
        .complete_step(
            &code,
            &step_key,
            &WorkflowContext {
                entity_id: payload.entity_id,
                entity: payload.entity,
                deadline_at: payload.deadline_at,
                user_id: Some(current_user.id),
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(started)))
}
