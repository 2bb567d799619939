use axum::{Json, extract::Path, http::StatusCode};
use recipehub_recipe::{
    Ingredient,
    ingredient::{self, CreateIngredient, UpdateIngredient},
};

use crate::{db::DbSession, error::AppError, extract::ValidatedJson};

pub async fn list(mut db: DbSession) -> Result<Json<Vec<Ingredient>>, AppError> {
    Ok(Json(ingredient::list(&mut db).await?))
}

pub async fn create(
    mut db: DbSession,
    ValidatedJson(input): ValidatedJson<CreateIngredient>,
) -> Result<(StatusCode, Json<Ingredient>), AppError> {
    let ingredient = ingredient::create(&mut db, input).await?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn show(mut db: DbSession, Path(id): Path<i64>) -> Result<Json<Ingredient>, AppError> {
    ingredient::find(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Ingredient {id} not found")))
}

pub async fn update(
    mut db: DbSession,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<UpdateIngredient>,
) -> Result<Json<Ingredient>, AppError> {
    Ok(Json(ingredient::update(&mut db, id, input).await?))
}

pub async fn delete(mut db: DbSession, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    ingredient::delete(&mut db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
