use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipehub_shared::QueueError;
use serde_json::{Value, json};
use thiserror::Error;

/// Gateway failures, rendered the way the gateway always has: `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication service is unavailable")]
    AuthUnavailable,

    /// The auth service answered with something other than 200.
    #[error("downstream answered {status}")]
    Downstream { status: StatusCode, detail: Value },

    #[error("OCR service is unavailable")]
    OcrUnavailable,

    #[error("OCR service timed out")]
    OcrTimeout,

    #[error("file is required")]
    MissingFile,

    #[error("{0}")]
    BadUpload(String),
}

/// Failures of the OCR round trip over the broker.
impl From<QueueError> for GatewayError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Timeout => GatewayError::OcrTimeout,
            _ => GatewayError::OcrUnavailable,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let message = Value::String(self.to_string());
        let (status, detail) = match self {
            GatewayError::Downstream { status, detail } => (status, detail),
            GatewayError::AuthUnavailable | GatewayError::OcrUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
            GatewayError::OcrTimeout => (StatusCode::GATEWAY_TIMEOUT, message),
            GatewayError::MissingFile | GatewayError::BadUpload(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
