use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

/// JSON body that must also pass its `validator` rules.
pub struct ValidatedJson<T>(pub T);

/// Malformed or invalid bodies are answered with 422 and a `detail` message.
#[derive(Debug)]
pub struct ValidationRejection(pub String);

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": self.0 })),
        )
            .into_response()
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationRejection(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ValidationRejection(errors.to_string()))?;

        Ok(Self(value))
    }
}
