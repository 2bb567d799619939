//! The ingredient service: ingredient catalogue and recipe quantities.

use axum::{
    Router,
    routing::{get, put},
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

mod ingredients;
mod recipe_ingredients;

pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/health", get(super::health::health))
        .route(
            "/api/v1/ingredients",
            get(ingredients::list).post(ingredients::create),
        )
        .route(
            "/api/v1/ingredients/{id}",
            get(ingredients::show)
                .put(ingredients::update)
                .delete(ingredients::delete),
        )
        .route(
            "/api/v1/recipes/{id}/ingredients",
            get(recipe_ingredients::list),
        )
        .route(
            "/api/v1/recipes/{id}/ingredients/{ingredient_id}",
            put(recipe_ingredients::set_quantity).delete(recipe_ingredients::remove),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}
