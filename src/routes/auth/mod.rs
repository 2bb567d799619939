//! The user service: registration, token issue and one-time passwords.

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::{auth::JwtKeys, email::Mailer};

mod otp;
mod token;
mod users;

#[derive(Clone, FromRef)]
pub struct AuthState {
    pub pool: SqlitePool,
    pub jwt: JwtKeys,
    pub mailer: Mailer,
    #[from_ref(skip)]
    pub otp_ttl: time::Duration,
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/api/v1", get(super::health::health))
        .route("/health", get(super::health::health))
        .route("/api/v1/auth/token", post(token::issue))
        .route("/api/v1/auth/users", post(users::register))
        .route("/api/v1/auth/users/me", get(users::me))
        .route("/api/v1/auth/users/generate_otp", post(otp::generate))
        .route("/api/v1/auth/users/verify_otp", post(otp::verify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
