//! Employee imprest handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use tms_core::domain::{
    CurrentUser, EmployeeImprestSummary, ImprestEntry, ImprestTransaction, ImprestVoucher,
};
use tms_shared::types::{Paginated, Pagination};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoucherListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn employee_summary(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<EmployeeImprestSummary>>>, ApiError> {
    let summary = state.imprest.employee_summary(&current_user).await?;
    Ok(Json(ApiResponse::success(summary)))
}

pub async fn transactions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<ImprestTransaction>>>, ApiError> {
    let transactions = state.imprest.transactions(user_id, &current_user).await?;
    Ok(Json(ApiResponse::success(transactions)))
}

pub async fn vouchers(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<VoucherListQuery>,
) -> Result<Json<ApiResponse<Paginated<ImprestVoucher>>>, ApiError> {
    let default_pagination = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default_pagination.page),
        limit: query.limit.unwrap_or(default_pagination.limit),
    };
    let page = state.imprest.vouchers(&current_user, pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ImprestEntry>>, ApiError> {
    let entry = state.imprest.approve(id, &current_user).await?;
    Ok(Json(ApiResponse::success(entry)))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ImprestEntry>>, ApiError> {
    let entry = state.imprest.reject(id, &current_user).await?;
    Ok(Json(ApiResponse::success(entry)))
}
