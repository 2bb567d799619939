use axum::Json;
use recipehub_shared::schemas::TokenData;
use recipehub_user::{CreateUser, User};

use crate::{auth::BearerClaims, db::DbSession, error::AppError, extract::ValidatedJson};

pub async fn register(
    mut db: DbSession,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<Json<User>, AppError> {
    let user = recipehub_user::create(&mut db, input).await?;

    Ok(Json(user))
}

pub async fn me(BearerClaims(claims): BearerClaims) -> Json<TokenData> {
    let username = if claims.sub.is_empty() {
        claims.email
    } else {
        claims.sub
    };

    Json(TokenData {
        username: Some(username),
    })
}
