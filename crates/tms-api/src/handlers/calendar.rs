//! Business calendar handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tms_shared::utils::hours_to_ms;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BusinessEndQuery {
    pub start: DateTime<Utc>,
    pub hours: i64,
}

#[derive(Debug, Serialize)]
pub struct BusinessEndResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct WorkingDayQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct WorkingDayResponse {
    pub date: NaiveDate,
    pub is_working_day: bool,
}

/// When a business-hours allocation starting at `start` runs out.
pub async fn business_end(
    State(state): State<AppState>,
    Query(query): Query<BusinessEndQuery>,
) -> Result<Json<ApiResponse<BusinessEndResponse>>, ApiError> {
    let end = state
        .calendar
        .add_business_ms(query.start, hours_to_ms(query.hours))
        .await?;
    Ok(Json(ApiResponse::success(BusinessEndResponse { start: query.start, end })))
}

pub async fn is_working_day(
    State(state): State<AppState>,
    Query(query): Query<WorkingDayQuery>,
) -> Result<Json<ApiResponse<WorkingDayResponse>>, ApiError> {
    let is_working_day = state.calendar.is_working_day(query.date).await?;
    Ok(Json(ApiResponse::success(WorkingDayResponse { date: query.date, is_working_day })))
}
