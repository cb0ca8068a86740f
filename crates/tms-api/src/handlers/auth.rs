//! Authentication HTTP handlers (login, register, refresh, logout)

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use tms_core::domain::{CurrentUser, Role};
use tms_core::error::DomainError;
use tms_core::repositories::UserRepository;
use tms_core::services::LoginResult;

use crate::error::{validation_failure, ApiError};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: Option<String>,
    pub team_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub team_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

fn auth_response(result: LoginResult) -> AuthResponse {
    AuthResponse {
        user: UserDto {
            id: result.user.id,
            name: result.user.name,
            email: result.user.email,
            role: result.user.role.as_str().to_string(),
            team_id: result.user.team_id,
        },
        access_token: result.tokens.access_token,
        refresh_token: result.tokens.refresh_token,
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    payload.validate().map_err(validation_failure)?;
    let result = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success(auth_response(result))))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    payload.validate().map_err(validation_failure)?;

    let role = match payload.role.as_deref() {
        None => Role::TenderExecutive,
        Some(value) => Role::from_str(value).ok_or_else(|| {
            ApiError(DomainError::ValidationError(format!("unknown role: {value}")))
        })?,
    };

    let user = state
        .auth
        .register(&payload.name, &payload.email, &payload.password, role, payload.team_id)
        .await?;

    Ok(Json(ApiResponse::success(UserDto {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.as_str().to_string(),
        team_id: user.team_id,
    })))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let result = state.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(ApiResponse::success(auth_response(result))))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth.logout(current_user.id).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .users
        .find_by_id(current_user.id)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    Ok(Json(ApiResponse::success(UserDto {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.as_str().to_string(),
        team_id: user.team_id,
    })))
}
