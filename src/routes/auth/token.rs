use axum::{Json, extract::State};
use recipehub_shared::schemas::Token;
use serde::Deserialize;
use validator::Validate;

use crate::{auth::JwtKeys, db::DbSession, error::AppError, extract::ValidatedJson};

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Exchanges an email and password for a bearer token.
pub async fn issue(
    State(jwt): State<JwtKeys>,
    mut db: DbSession,
    ValidatedJson(input): ValidatedJson<Credentials>,
) -> Result<Json<Token>, AppError> {
    let Some(user) = recipehub_user::authenticate(&mut db, input.username, &input.password).await?
    else {
        return Err(AppError::Unauthorized(
            "Incorrect username or password".to_owned(),
        ));
    };

    let access_token = jwt.generate_token(user.id, &user.name, &user.email)?;

    tracing::info!(user_id = user.id, "Issued access token");

    Ok(Json(Token::bearer(access_token)))
}
