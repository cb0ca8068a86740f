//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use tms_core::error::DomainError;

use crate::response::ApiResponse;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DomainError::UserNotFound
            | DomainError::TenderNotFound(_)
            | DomainError::PaymentRequestNotFound(_)
            | DomainError::InstrumentNotFound(_)
            | DomainError::FollowUpNotFound(_)
            | DomainError::CourierNotFound(_)
            | DomainError::ImprestEntryNotFound(_)
            | DomainError::CostingSheetNotFound(_)
            | DomainError::TimerNotFound { .. }
            | DomainError::WorkflowNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),

            DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            DomainError::UserNotActive => (StatusCode::FORBIDDEN, "USER_NOT_ACTIVE"),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),

            DomainError::EmailAlreadyExists(_)
            | DomainError::TimerAlreadyRunning
            | DomainError::TimerPaused
            | DomainError::TimerStateConflict { .. }
            | DomainError::CostingNotPending { .. } => (StatusCode::CONFLICT, "CONFLICT"),

            DomainError::TransitionFromRejected
            | DomainError::TransitionFromTerminal(_)
            | DomainError::StageNotReachable { .. }
            | DomainError::NotRejected(_)
            | DomainError::UnknownInstrumentStatus { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TRANSITION")
            }

            DomainError::ValidationError(_)
            | DomainError::NonPositiveDuration
            | DomainError::PasswordTooWeak => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),

            DomainError::DatabaseError(_)
            | DomainError::QueueError(_)
            | DomainError::MailError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        } else {
            tracing::warn!("request rejected: {}", self.0);
        }

        // Internal detail stays in the logs.
        let message = if status.is_server_error() {
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

/// 400 with the validator's field report.
pub fn validation_failure(errors: validator::ValidationErrors) -> ApiError {
    ApiError(DomainError::ValidationError(errors.to_string()))
}
