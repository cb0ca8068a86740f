//! Courier handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use tms_core::domain::{Courier, CourierDoc, CurrentUser};
use tms_core::repositories::NewCourier;
use tms_core::services::{DeliveryInput, DispatchInput};
use tms_shared::types::{Paginated, Pagination};

use crate::error::{validation_failure, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourierBody {
    #[validate(length(min = 1, max = 300))]
    pub to_org: String,
    #[validate(length(min = 1, max = 300))]
    pub to_name: String,
    #[validate(length(min = 1))]
    pub to_addr: String,
    #[validate(length(min = 4, max = 10))]
    pub to_pin: String,
    #[validate(length(min = 8, max = 20))]
    pub to_mobile: String,
    #[validate(length(min = 1, max = 300))]
    pub emp_from: String,
    #[validate(length(min = 1, max = 20))]
    pub urgency: String,
    pub expected_delivery_date: NaiveDate,
    #[serde(default)]
    pub docs: Vec<CourierDoc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DispatchBody {
    #[validate(length(min = 1, max = 200))]
    pub courier_provider: String,
    #[validate(length(min = 1, max = 255))]
    pub docket_no: String,
    pub pickup_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryBody {
    pub delivery_date: NaiveDate,
    pub delivery_pod: Option<String>,
    #[serde(default = "default_delivered")]
    pub delivered: bool,
}

fn default_delivered() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CourierListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateCourierBody>,
) -> Result<Json<ApiResponse<Courier>>, ApiError> {
    payload.validate().map_err(validation_failure)?;

    let created = state
        .couriers
        .create(NewCourier {
            user_id: current_user.id,
            to_org: payload.to_org,
            to_name: payload.to_name,
            to_addr: payload.to_addr,
            to_pin: payload.to_pin,
            to_mobile: payload.to_mobile,
            emp_from: payload.emp_from,
            urgency: payload.urgency,
            expected_delivery_date: payload.expected_delivery_date,
            docs: payload.docs,
        })
        .await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<CourierListQuery>,
) -> Result<Json<ApiResponse<Paginated<Courier>>>, ApiError> {
    let default_pagination = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default_pagination.page),
        limit: query.limit.unwrap_or(default_pagination.limit),
    };
    let page = state.couriers.list(&current_user, pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Courier>>, ApiError> {
    let courier = state.couriers.find(id).await?;
    Ok(Json(ApiResponse::success(courier)))
}

pub async fn dispatch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DispatchBody>,
) -> Result<Json<ApiResponse<Courier>>, ApiError> {
    payload.validate().map_err(validation_failure)?;
    let updated = state
        .couriers
        .dispatch(
            id,
            DispatchInput {
                courier_provider: payload.courier_provider,
                docket_no: payload.docket_no,
                pickup_date: payload.pickup_date,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn record_delivery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DeliveryBody>,
) -> Result<Json<ApiResponse<Courier>>, ApiError> {
    let updated = state
        .couriers
        .record_delivery(
            id,
            DeliveryInput {
                delivery_date: payload.delivery_date,
                delivery_pod: payload.delivery_pod,
                delivered: payload.delivered,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Courier>>, ApiError> {
    let updated = state.couriers.reject(id).await?;
    Ok(Json(ApiResponse::success(updated)))
}
