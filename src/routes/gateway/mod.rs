//! Public entry point: relays authentication to the auth service and OCR
//! uploads to the OCR worker.

use axum::{
    Json, Router,
    extract::FromRef,
    routing::{get, post},
};
use recipehub_shared::{ChannelPool, RpcClient, ServiceClient};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::JwtKeys;

mod auth;
mod error;
mod health;
mod ocr;
mod relay;

pub use error::GatewayError;

/// Queues the gateway owns, declared at startup.
pub const DURABLE_QUEUES: [&str; 2] = ["gatewayservice", "authservice"];

#[derive(Clone, FromRef)]
pub struct GatewayState {
    pub auth: ServiceClient,
    pub jwt: JwtKeys,
    pub rpc: RpcClient,
    pub queues: ChannelPool,
    #[from_ref(skip)]
    pub ocr_queue: String,
}

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health))
        .route("/auth", get(auth::check))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/generate_otp", post(auth::generate_otp))
        .route("/auth/verify_otp", post(auth::verify_otp))
        .route("/ocr", post(ocr::upload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<&'static str> {
    Json("You are welcome my buddy.")
}
