//! Shared setup for the service integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use recipehub::{
    auth::JwtKeys,
    email::Mailer,
    routes::{auth::AuthState, gateway::GatewayState},
};
use recipehub_shared::{ChannelPool, QueueSettings, QueueSystem, RpcClient, ServiceClient};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";
pub const BOUNDARY: &str = "recipehub-test-boundary";

pub async fn setup_test_pool(dir: &Path) -> anyhow::Result<SqlitePool> {
    let url = format!("sqlite:{}", dir.join("recipe_db.db").display());
    let pool = recipehub::create_pool(&url, 4).await?;
    recipehub::db::migrate(&pool).await?;

    Ok(pool)
}

pub fn jwt_keys() -> JwtKeys {
    JwtKeys::new(SECRET, Duration::from_secs(30 * 60))
}

/// A pool pointed at a closed port, failing fast.
pub fn unreachable_queues() -> ChannelPool {
    ChannelPool::new(
        QueueSystem::new(QueueSettings {
            host: "127.0.0.1".to_owned(),
            port: 1,
            connection_attempts: 1,
            retry_delay: Duration::ZERO,
            socket_timeout: Duration::from_secs(1),
            ..QueueSettings::default()
        }),
        2,
    )
}

pub fn auth_state(pool: SqlitePool, mailer: Mailer) -> AuthState {
    AuthState {
        pool,
        jwt: jwt_keys(),
        mailer,
        otp_ttl: recipehub_user::OTP_TTL,
    }
}

pub fn gateway_state(auth_base_url: &str) -> GatewayState {
    let queues = unreachable_queues();

    GatewayState {
        auth: ServiceClient::new(auth_base_url, "auth"),
        jwt: jwt_keys(),
        rpc: RpcClient::new(queues.clone(), Duration::from_secs(1)),
        queues,
        ocr_queue: "ocr_service".to_owned(),
    }
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn bearer_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Multipart body with a single part named `field`.
pub fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"recipe.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    body
}

pub fn ocr_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/ocr").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::from(body)).unwrap()
}

/// Runs one request and returns its status and JSON body (`Null` when empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
