use axum::{Json, extract::State};
use recipehub_shared::ServiceClient;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

use super::{GatewayError, relay::forward};
use crate::extract::ValidatedJson;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UserRegistration {
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct GenerateOtp {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct VerifyOtp {
    #[validate(email)]
    pub email: String,
    pub otp: String,
}

pub async fn check(State(auth): State<ServiceClient>) -> Result<Json<Value>, GatewayError> {
    forward(&auth, Method::GET, "/api/v1", None).await
}

pub async fn login(
    State(auth): State<ServiceClient>,
    ValidatedJson(input): ValidatedJson<UserCredentials>,
) -> Result<Json<Value>, GatewayError> {
    let body = json!({"username": input.username, "password": input.password});

    forward(&auth, Method::POST, "/api/v1/auth/token", Some(&body)).await
}

pub async fn register(
    State(auth): State<ServiceClient>,
    ValidatedJson(input): ValidatedJson<UserRegistration>,
) -> Result<Json<Value>, GatewayError> {
    let body = json!({"name": input.name, "email": input.email, "password": input.password});

    forward(&auth, Method::POST, "/api/v1/auth/users", Some(&body)).await
}

pub async fn generate_otp(
    State(auth): State<ServiceClient>,
    ValidatedJson(input): ValidatedJson<GenerateOtp>,
) -> Result<Json<Value>, GatewayError> {
    let body = json!({"email": input.email});

    forward(&auth, Method::POST, "/api/v1/auth/users/generate_otp", Some(&body)).await
}

pub async fn verify_otp(
    State(auth): State<ServiceClient>,
    ValidatedJson(input): ValidatedJson<VerifyOtp>,
) -> Result<Json<Value>, GatewayError> {
    let body = json!({"email": input.email, "otp": input.otp});

    forward(&auth, Method::POST, "/api/v1/auth/users/verify_otp", Some(&body)).await
}
