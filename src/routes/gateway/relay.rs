use axum::{Json, http::StatusCode};
use recipehub_shared::{ServiceClient, queue::parse_reply};
use reqwest::Method;
use serde_json::Value;

use super::GatewayError;

/// Forwards one call to the auth service.
///
/// A 200 answer is returned verbatim. Any other status is mirrored with the
/// downstream body as `detail`. Transport failures collapse into
/// [`GatewayError::AuthUnavailable`].
pub async fn forward(
    client: &ServiceClient,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
) -> Result<Json<Value>, GatewayError> {
    let url = client.url(endpoint);
    let mut request = client.http().request(method.clone(), &url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let unavailable = |e: reqwest::Error| {
        tracing::error!(
            service = %client.service_name(),
            method = %method,
            url = %url,
            error = %e,
            "Authentication service is unavailable"
        );
        GatewayError::AuthUnavailable
    };

    let response = request.send().await.map_err(unavailable)?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(unavailable)?;
    let payload = parse_reply(&bytes);

    if status == StatusCode::OK {
        return Ok(Json(payload));
    }

    tracing::info!(url = %url, status = %status, "Mirroring downstream error");

    Err(GatewayError::Downstream {
        status,
        detail: payload,
    })
}
