use axum::{Json, extract::Path, http::StatusCode};
use recipehub_recipe::{
    RecipeIngredient, recipe,
    recipe_ingredient::{self, SetQuantity},
};

use crate::{db::DbSession, error::AppError, extract::ValidatedJson};

pub async fn list(
    mut db: DbSession,
    Path(recipe_id): Path<i64>,
) -> Result<Json<Vec<RecipeIngredient>>, AppError> {
    if recipe::find(&mut db, recipe_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Recipe {recipe_id} not found")));
    }

    Ok(Json(recipe_ingredient::list(&mut db, recipe_id).await?))
}

pub async fn set_quantity(
    mut db: DbSession,
    Path((recipe_id, ingredient_id)): Path<(i64, i64)>,
    ValidatedJson(input): ValidatedJson<SetQuantity>,
) -> Result<Json<RecipeIngredient>, AppError> {
    let item =
        recipe_ingredient::set_quantity(&mut db, recipe_id, ingredient_id, input.quantity).await?;

    Ok(Json(item))
}

pub async fn remove(
    mut db: DbSession,
    Path((recipe_id, ingredient_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    recipe_ingredient::remove(&mut db, recipe_id, ingredient_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
