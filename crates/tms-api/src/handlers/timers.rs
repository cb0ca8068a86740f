//! Stage timer handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use tms_core::domain::{CurrentUser, TimerConfig, TimerEvent, TimerSnapshot};
use tms_core::services::{StartTimerInput, TimerActionInput};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartTimerBody {
    pub entity_type: String,
    pub entity_id: i64,
    pub stage: String,
    pub allocated_time_ms: Option<i64>,
    pub timer_config: Option<TimerConfig>,
    pub deadline_at: Option<DateTime<Utc>>,
    pub assigned_user_id: Option<i64>,
    pub assigned_role: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TimerActionBody {
    pub entity_type: String,
    pub entity_id: i64,
    pub stage: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendTimerBody {
    #[serde(flatten)]
    pub action: TimerActionBody,
    pub extension_ms: i64,
}

#[derive(Debug, Deserialize)]
pub struct TimerListQuery {
    pub entity_type: String,
    pub entity_id: i64,
    #[serde(default)]
    pub active_only: bool,
}

fn action_input(body: TimerActionBody, current_user: &CurrentUser) -> TimerActionInput {
    TimerActionInput {
        entity_type: body.entity_type,
        entity_id: body.entity_id,
        stage: body.stage,
        user_id: Some(current_user.id),
        reason: body.reason,
    }
}

pub async fn start(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StartTimerBody>,
) -> Result<Json<ApiResponse<TimerSnapshot>>, ApiError> {
    let snapshot = state
        .timers
        .start(StartTimerInput {
            entity_type: payload.entity_type,
            entity_id: payload.entity_id,
            stage: payload.stage,
            allocated_time_ms: payload.allocated_time_ms,
            timer_config: payload.timer_config,
            deadline_at: payload.deadline_at,
            assigned_user_id: payload.assigned_user_id,
            assigned_role: payload.assigned_role,
            workflow_code: None,
            step_order: None,
            user_id: Some(current_user.id),
            metadata: payload.metadata,
        })
        .await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn stop(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TimerActionBody>,
) -> Result<Json<ApiResponse<TimerSnapshot>>, ApiError> {
    let snapshot = state.timers.stop(action_input(payload, &current_user)).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn pause(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TimerActionBody>,
) -> Result<Json<ApiResponse<TimerSnapshot>>, ApiError> {
    let snapshot = state.timers.pause(action_input(payload, &current_user)).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn resume(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TimerActionBody>,
) -> Result<Json<ApiResponse<TimerSnapshot>>, ApiError> {
    let snapshot = state.timers.resume(action_input(payload, &current_user)).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TimerActionBody>,
) -> Result<Json<ApiResponse<TimerSnapshot>>, ApiError> {
    let snapshot = state.timers.cancel(action_input(payload, &current_user)).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn extend(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ExtendTimerBody>,
) -> Result<Json<ApiResponse<TimerSnapshot>>, ApiError> {
    let snapshot = state
        .timers
        .extend(action_input(payload.action, &current_user), payload.extension_ms)
        .await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TimerListQuery>,
) -> Result<Json<ApiResponse<Vec<TimerSnapshot>>>, ApiError> {
    let snapshots = if query.active_only {
        state.timers.list_active(&query.entity_type, query.entity_id).await?
    } else {
        state.timers.list(&query.entity_type, query.entity_id).await?
    };
    Ok(Json(ApiResponse::success(snapshots)))
}

pub async fn events(
    State(state): State<AppState>,
    Path((entity_type, entity_id, stage)): Path<(String, i64, String)>,
) -> Result<Json<ApiResponse<Vec<TimerEvent>>>, ApiError> {
    let events = state.timers.events(&entity_type, entity_id, &stage).await?;
    Ok(Json(ApiResponse::success(events)))
}
