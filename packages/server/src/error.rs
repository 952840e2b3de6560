use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lifecycle::gate::Denial;
use lifecycle::{LifecycleError, Unavailable};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `PHASE_CLOSED`,
    /// `NOT_FOUND`, `CONFLICT`, `NOTIFICATION_FAILED`, `INTERNAL_ERROR`.
    #[schema(example = "PHASE_CLOSED")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "hackathon ended already!")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// The caller's role does not allow the action.
    PermissionDenied(String),
    /// The action is not open in the hackathon's current phase.
    PhaseClosed(String),
    NotFound(String),
    Conflict(String),
    NotificationFailed(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Incorrect password".into(),
                },
            ),
            AppError::PermissionDenied(msg) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: msg,
                },
            ),
            AppError::PhaseClosed(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "PHASE_CLOSED",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::NotificationFailed(detail) => {
                tracing::error!("Notification failed: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        code: "NOTIFICATION_FAILED",
                        message: "The change was saved but the notification could not be sent"
                            .into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Unauthenticated => AppError::TokenInvalid,
            LifecycleError::Forbidden(Denial::Role(reason)) => {
                AppError::PermissionDenied(reason.to_string())
            }
            LifecycleError::Forbidden(Denial::Phase(reason)) => {
                AppError::PhaseClosed(reason.to_string())
            }
            LifecycleError::NotFound(msg) => AppError::NotFound(msg),
            LifecycleError::Conflict(msg) => AppError::Conflict(msg),
            LifecycleError::Validation(msg) => AppError::Validation(msg),
            LifecycleError::Unavailable(Unavailable::Notification(e)) => {
                AppError::NotificationFailed(e.to_string())
            }
            LifecycleError::Unavailable(Unavailable::Storage(detail)) => AppError::Internal(detail),
        }
    }
}
