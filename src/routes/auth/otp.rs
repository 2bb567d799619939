use axum::{Json, extract::State};
use recipehub_shared::schemas::EmailRequest;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::Connection;
use time::OffsetDateTime;
use validator::Validate;

use super::AuthState;
use crate::{db::DbSession, error::AppError, extract::ValidatedJson};

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateOtp {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtp {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// Stores a new code and asks the notification worker to email it. The code is
/// only committed once the email is queued, so a failed publish keeps the
/// previous code valid.
pub async fn generate(
    State(state): State<AuthState>,
    mut db: DbSession,
    ValidatedJson(input): ValidatedJson<GenerateOtp>,
) -> Result<Json<Value>, AppError> {
    let mut tx = db.begin().await?;
    let code = recipehub_user::generate_otp(&mut tx, &input.email, state.otp_ttl).await?;

    state
        .mailer
        .send(EmailRequest {
            recipient: input.email,
            subject: "Your OTP Code".to_owned(),
            body: format!(
                "Your OTP code is {code}. It expires in {} minutes.",
                state.otp_ttl.whole_minutes()
            ),
        })
        .await
        .map_err(|_| AppError::Unavailable("Email service is unavailable".to_owned()))?;

    tx.commit().await?;

    Ok(Json(json!({"message": "OTP sent to email"})))
}

pub async fn verify(
    mut db: DbSession,
    ValidatedJson(input): ValidatedJson<VerifyOtp>,
) -> Result<Json<Value>, AppError> {
    let verified =
        recipehub_user::verify_otp(&mut db, &input.email, &input.otp, OffsetDateTime::now_utc())
            .await?;

    if !verified {
        return Err(AppError::BadRequest("Invalid or expired OTP".to_owned()));
    }

    Ok(Json(json!({"message": "OTP verified successfully"})))
}
