use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use recipehub_shared::{ServiceError, schemas::ErrorResponse};
use thiserror::Error;

/// Errors of the auth and ingredient services, rendered as [`ErrorResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<recipehub_shared::Error> for AppError {
    fn from(err: recipehub_shared::Error) -> Self {
        match err {
            recipehub_shared::Error::NotFound(msg) => AppError::NotFound(msg),
            recipehub_shared::Error::Conflict(msg) => AppError::BadRequest(msg),
            recipehub_shared::Error::Invalid(msg) => AppError::Validation(msg),
            recipehub_shared::Error::Unknown(e) => AppError::Internal(e),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Unavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Unauthorized(msg) => {
                let body = Json(ErrorResponse::new(msg, "unauthorized"));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    body,
                )
                    .into_response();
            }
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            AppError::Unavailable(msg) => {
                tracing::warn!("Dependency unavailable: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(detail, code))).into_response()
    }
}
