//! Tender dashboard handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use tms_core::dashboard::TENDERING_DASHBOARD_TABS;
use tms_core::domain::{CurrentUser, TenderRow};
use tms_core::repositories::BucketCount;
use tms_core::services::TabRequest;
use tms_shared::types::{Paginated, Pagination, SortOrder};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TabQueryParams {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn tabs() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(
        TENDERING_DASHBOARD_TABS.iter().map(|t| t.key).collect(),
    ))
}

pub async fn tab(
    State(state): State<AppState>,
    Path(tab_key): Path<String>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<TabQueryParams>,
) -> Result<Json<ApiResponse<Paginated<TenderRow>>>, ApiError> {
    let default_pagination = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default_pagination.page),
        limit: query.limit.unwrap_or(default_pagination.limit),
    };

    let page = state
        .dashboards
        .tab(
            &tab_key,
            TabRequest {
                search: query.search,
                sort_by: query.sort_by,
                sort_order: query.sort_order,
            },
            pagination,
            &current_user,
        )
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn bucket_counts(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<BucketCount>>>, ApiError> {
    let counts = state.dashboards.bucket_counts(&current_user).await?;
    Ok(Json(ApiResponse::success(counts)))
}
