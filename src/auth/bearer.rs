use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde_json::json;

use super::jwt::{Claims, JwtKeys};

/// Claims of a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

#[derive(Debug, PartialEq, Eq)]
pub enum BearerRejection {
    Missing,
    Invalid,
}

impl IntoResponse for BearerRejection {
    fn into_response(self) -> Response {
        let detail = match self {
            BearerRejection::Missing => "Not authenticated",
            BearerRejection::Invalid => "Invalid JWT token",
        };

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(json!({ "detail": detail })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for BearerClaims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BearerRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| BearerRejection::Missing)?;

        let keys = JwtKeys::from_ref(state);

        match keys.validate_token(bearer.token()) {
            Ok(claims) => Ok(Self(claims)),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected bearer token");
                Err(BearerRejection::Invalid)
            }
        }
    }
}
