use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use super::{GatewayError, GatewayState};
use crate::auth::{BearerClaims, Claims};

/// Sends the uploaded image to the OCR worker on behalf of the token holder.
pub async fn upload(
    State(state): State<GatewayState>,
    BearerClaims(claims): BearerClaims,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, GatewayError> {
    let mut multipart = multipart.map_err(|e| GatewayError::BadUpload(e.body_text()))?;
    let file = read_file(&mut multipart).await?;
    let envelope = envelope(&claims, &file);
    drop(file);

    tracing::info!(user_id = claims.id, queue = %state.ocr_queue, "Forwarding OCR request");

    let reply = state.rpc.call(&state.ocr_queue, &envelope).await?;

    Ok(Json(reply))
}

async fn read_file(multipart: &mut Multipart) -> Result<Bytes, GatewayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::BadUpload(e.body_text()))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| GatewayError::BadUpload(e.body_text()));
        }
    }

    Err(GatewayError::MissingFile)
}

/// RPC payload understood by the OCR worker.
pub fn envelope(claims: &Claims, file: &[u8]) -> Value {
    json!({
        "user_name": claims.name,
        "user_email": claims.email,
        "user_id": claims.id,
        "file": STANDARD.encode(file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_token_identity_and_encoded_file() {
        let claims = Claims {
            id: 3,
            name: "John".to_owned(),
            email: "john@recipehub.localhost".to_owned(),
            sub: "john@recipehub.localhost".to_owned(),
            exp: None,
        };

        let value = envelope(&claims, b"hello");

        assert_eq!(
            value,
            json!({
                "user_name": "John",
                "user_email": "john@recipehub.localhost",
                "user_id": 3,
                "file": "aGVsbG8=",
            })
        );
    }
}
