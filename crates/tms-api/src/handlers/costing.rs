//! Costing approval handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use tms_core::domain::{CostingApprovalRow, CostingSheet, CurrentUser};

use crate::error::{validation_failure, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RejectCostingBody {
    #[validate(length(min = 1))]
    pub remarks: String,
}

pub async fn approval_dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<CostingApprovalRow>>>, ApiError> {
    let rows = state.costing.approval_dashboard(&current_user).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<CostingSheet>>, ApiError> {
    let sheet = state.costing.approve(id, &current_user).await?;
    Ok(Json(ApiResponse::success(sheet)))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RejectCostingBody>,
) -> Result<Json<ApiResponse<CostingSheet>>, ApiError> {
    payload.validate().map_err(validation_failure)?;
    let sheet = state.costing.reject(id, payload.remarks, &current_user).await?;
    Ok(Json(ApiResponse::success(sheet)))
}
