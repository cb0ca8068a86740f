//! Bearer-JWT authentication middleware

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use tms_core::domain::CurrentUser;
use tms_core::repositories::UserRepository;

use crate::response::ApiResponse;
use crate::state::AppState;

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error("UNAUTHORIZED", message)),
    )
        .into_response()
}

/// Resolves the bearer token to a [`CurrentUser`] in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return unauthorized("missing bearer token");
    };

    let claims = match state.jwt.validate_token(token) {
        Ok(claims) => claims,
        Err(_) => return unauthorized("invalid or expired token"),
    };
    if claims.token_type != "access" {
        return unauthorized("refresh tokens cannot access the API");
    }

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return unauthorized("malformed token subject");
    };

    // The token only proves identity; role and team come from the live row so
    // deactivation takes effect immediately.
    let user = match state.users.find_by_id(user_id).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return unauthorized("account is not active"),
        Err(e) => {
            tracing::error!("auth lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("INTERNAL_ERROR", "internal server error")),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        role: user.role,
        team_id: user.team_id,
    });

    next.run(request).await
}
