//! Payment request and instrument handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use tms_core::domain::{
    AvailableActions, CurrentUser, InstrumentKind, InstrumentStatusHistory, PaymentInstrument,
    PaymentPurpose, PaymentRequest, StatusChangeContext,
};
use tms_core::error::DomainError;
use tms_core::repositories::{InstrumentRepository, NewInstrument, NewPaymentRequest};

use crate::error::{validation_failure, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequestBody {
    pub tender_id: i64,
    pub purpose: String,
    pub amount_required: Decimal,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub requested_by: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInstrumentBody {
    pub kind: String,
    pub amount: Decimal,
    #[validate(length(max = 500))]
    pub favouring: Option<String>,
    #[validate(length(max = 500))]
    pub payable_at: Option<String>,
    pub courier_address: Option<String>,
    pub courier_deadline: Option<i32>,
    #[serde(default)]
    pub form_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub status: String,
    #[serde(default)]
    pub form_data: Value,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectBody {
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ResubmitBody {
    #[serde(default)]
    pub form_data: Value,
}

fn parse_kind(value: &str) -> Result<InstrumentKind, ApiError> {
    InstrumentKind::from_str(value).ok_or_else(|| {
        ApiError(DomainError::ValidationError(format!("unknown instrument kind: {value}")))
    })
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequestBody>,
) -> Result<Json<ApiResponse<PaymentRequest>>, ApiError> {
    payload.validate().map_err(validation_failure)?;

    let purpose = PaymentPurpose::from_str(&payload.purpose).ok_or_else(|| {
        ApiError(DomainError::ValidationError(format!(
            "unknown payment purpose: {}",
            payload.purpose
        )))
    })?;

    let created = state
        .instruments
        .create_request(&NewPaymentRequest {
            tender_id: payload.tender_id,
            purpose,
            amount_required: payload.amount_required,
            due_date: payload.due_date,
            requested_by: payload.requested_by,
            remarks: payload.remarks,
        })
        .await?;

    Ok(Json(ApiResponse::success(created)))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PaymentRequest>>, ApiError> {
    let request = state
        .instruments
        .find_request(id)
        .await?
        .ok_or(DomainError::PaymentRequestNotFound(id))?;
    Ok(Json(ApiResponse::success(request)))
}

pub async fn list_requests_for_tender(
    State(state): State<AppState>,
    Path(tender_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PaymentRequest>>>, ApiError> {
    let requests = state.instruments.list_requests_for_tender(tender_id).await?;
    Ok(Json(ApiResponse::success(requests)))
}

pub async fn create_instrument(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateInstrumentBody>,
) -> Result<Json<ApiResponse<PaymentInstrument>>, ApiError> {
    payload.validate().map_err(validation_failure)?;
    let kind = parse_kind(&payload.kind)?;

    let created = state
        .instrument_status
        .register(
            NewInstrument {
                request_id,
                kind,
                amount: payload.amount,
                favouring: payload.favouring,
                payable_at: payload.payable_at,
                status: String::new(),
                courier_address: payload.courier_address,
                courier_deadline: payload.courier_deadline,
            },
            payload.form_data,
            StatusChangeContext { changed_by: Some(current_user.id), rejection_reason: None },
        )
        .await?;

    Ok(Json(ApiResponse::success(created)))
}

pub async fn get_instrument(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PaymentInstrument>>, ApiError> {
    let instrument = state
        .instruments
        .find_instrument(id)
        .await?
        .ok_or(DomainError::InstrumentNotFound(id))?;
    Ok(Json(ApiResponse::success(instrument)))
}

pub async fn list_instruments(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PaymentInstrument>>>, ApiError> {
    let instruments = state.instruments.list_instruments(request_id).await?;
    Ok(Json(ApiResponse::success(instruments)))
}

pub async fn transition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TransitionBody>,
) -> Result<Json<ApiResponse<PaymentInstrument>>, ApiError> {
    let updated = state
        .instrument_status
        .transition(
            id,
            &payload.status,
            payload.form_data,
            StatusChangeContext { changed_by: Some(current_user.id), rejection_reason: None },
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RejectBody>,
) -> Result<Json<ApiResponse<PaymentInstrument>>, ApiError> {
    payload.validate().map_err(validation_failure)?;
    let updated = state
        .instrument_status
        .reject(
            id,
            payload.reason,
            StatusChangeContext { changed_by: Some(current_user.id), rejection_reason: None },
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn resubmit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ResubmitBody>,
) -> Result<Json<ApiResponse<PaymentInstrument>>, ApiError> {
    let replacement = state
        .instrument_status
        .resubmit(
            id,
            payload.form_data,
            StatusChangeContext { changed_by: Some(current_user.id), rejection_reason: None },
        )
        .await?;
    Ok(Json(ApiResponse::success(replacement)))
}

pub async fn available_actions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AvailableActions>>, ApiError> {
    let actions = state.instrument_status.available_actions(id).await?;
    Ok(Json(ApiResponse::success(actions)))
}

pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<InstrumentStatusHistory>>>, ApiError> {
    state
        .instruments
        .find_instrument(id)
        .await?
        .ok_or(DomainError::InstrumentNotFound(id))?;
    let entries = state.instruments.history(id).await?;
    Ok(Json(ApiResponse::success(entries)))
}
