//! Follow-up handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use tms_core::domain::{CurrentUser, FollowUp, FollowUpTab, Frequency, StopReason};
use tms_core::error::DomainError;
use tms_core::repositories::{FollowUpAmountSummary, FollowUpListFilter, UserRepository};
use tms_core::services::{ContactInput, CreateFollowUpInput, StatusUpdateInput, UpdateFollowUpInput};
use tms_shared::types::{Paginated, Pagination, SortOrder};

use crate::error::{validation_failure, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactBody {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 300))]
    pub org: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFollowUpBody {
    #[validate(length(min = 1, max = 200))]
    pub area: String,
    #[validate(length(min = 1, max = 500))]
    pub party_name: String,
    pub amount: Option<Decimal>,
    pub assigned_to_id: i64,
    pub comment: Option<String>,
    #[validate(nested)]
    pub contacts: Vec<ContactBody>,
    pub start_from: Option<NaiveDate>,
    pub instrument_id: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateFollowUpBody {
    pub area: Option<String>,
    pub party_name: Option<String>,
    pub amount: Option<Decimal>,
    pub assigned_to_id: Option<i64>,
    pub details: Option<String>,
    pub frequency: Option<Frequency>,
    pub start_from: Option<NaiveDate>,
    pub stop_reason: Option<StopReason>,
    pub proof_text: Option<String>,
    pub proof_image_path: Option<String>,
    pub stop_remarks: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub contacts: Option<Vec<ContactBody>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatusUpdateBody {
    pub latest_comment: Option<String>,
    pub frequency: Option<Frequency>,
    pub stop_reason: Option<StopReason>,
    pub proof_text: Option<String>,
    pub proof_image_path: Option<String>,
    pub stop_remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpListQuery {
    pub tab: Option<FollowUpTab>,
    pub assigned_to_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn contact_inputs(contacts: Vec<ContactBody>) -> Vec<ContactInput> {
    contacts
        .into_iter()
        .map(|c| ContactInput { name: c.name, email: c.email, phone: c.phone, org: c.org })
        .collect()
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateFollowUpBody>,
) -> Result<Json<ApiResponse<FollowUp>>, ApiError> {
    payload.validate().map_err(validation_failure)?;

    let created = state
        .follow_ups
        .create(
            CreateFollowUpInput {
                area: payload.area,
                party_name: payload.party_name,
                amount: payload.amount,
                assigned_to_id: payload.assigned_to_id,
                comment: payload.comment,
                contacts: contact_inputs(payload.contacts),
                start_from: payload.start_from,
                instrument_id: payload.instrument_id,
            },
            &current_user,
        )
        .await?;

    Ok(Json(ApiResponse::success(created)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<FollowUpListQuery>,
) -> Result<Json<ApiResponse<Paginated<FollowUp>>>, ApiError> {
    let default_pagination = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default_pagination.page),
        limit: query.limit.unwrap_or(default_pagination.limit),
    };

    let page = state
        .follow_ups
        .list(
            FollowUpListFilter {
                tab: query.tab,
                assigned_to_id: query.assigned_to_id,
                search: query.search,
                sort_by: query.sort_by,
                sort_order: query.sort_order,
                today: Utc::now().date_naive(),
            },
            pagination,
            &current_user,
        )
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<FollowUp>>, ApiError> {
    let follow_up = state.follow_ups.find(id).await?;
    Ok(Json(ApiResponse::success(follow_up)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFollowUpBody>,
) -> Result<Json<ApiResponse<FollowUp>>, ApiError> {
    let updated = state
        .follow_ups
        .update(
            id,
            UpdateFollowUpInput {
                area: payload.area,
                party_name: payload.party_name,
                amount: payload.amount,
                assigned_to_id: payload.assigned_to_id,
                details: payload.details,
                frequency: payload.frequency,
                start_from: payload.start_from,
                stop_reason: payload.stop_reason,
                proof_text: payload.proof_text,
                proof_image_path: payload.proof_image_path,
                stop_remarks: payload.stop_remarks,
                attachments: payload.attachments,
                contacts: payload.contacts.map(contact_inputs),
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StatusUpdateBody>,
) -> Result<Json<ApiResponse<FollowUp>>, ApiError> {
    let user = state
        .users
        .find_by_id(current_user.id)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    let updated = state
        .follow_ups
        .update_status(
            id,
            StatusUpdateInput {
                latest_comment: payload.latest_comment,
                frequency: payload.frequency,
                stop_reason: payload.stop_reason,
                proof_text: payload.proof_text,
                proof_image_path: payload.proof_image_path,
                stop_remarks: payload.stop_remarks,
            },
            &user.name,
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.follow_ups.remove(id).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn amount_summary(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<FollowUpAmountSummary>>>, ApiError> {
    let summary = state.follow_ups.amount_summary(&current_user).await?;
    Ok(Json(ApiResponse::success(summary)))
}
