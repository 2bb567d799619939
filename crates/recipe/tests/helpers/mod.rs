use std::{path::PathBuf, str::FromStr};

use recipehub_recipe::{
    Ingredient, Recipe,
    ingredient::CreateIngredient,
    recipe::CreateRecipe,
};
use recipehub_user::{CreateUser, User};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub async fn setup_test_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    recipehub_db::migrate(&mut conn).await?;

    Ok(pool)
}

#[allow(dead_code)]
pub async fn create_user(pool: &SqlitePool, name: impl Into<String>) -> anyhow::Result<User> {
    let name = name.into();
    let mut conn = pool.acquire().await?;

    Ok(recipehub_user::create(
        &mut conn,
        CreateUser {
            email: format!("{name}@recipehub.localhost"),
            name,
            password: "my_password".to_owned(),
        },
    )
    .await?)
}

#[allow(dead_code)]
pub async fn create_recipe(
    pool: &SqlitePool,
    user_id: i64,
    title: impl Into<String>,
) -> anyhow::Result<Recipe> {
    let mut conn = pool.acquire().await?;

    Ok(recipehub_recipe::recipe::create(
        &mut conn,
        user_id,
        CreateRecipe {
            title: title.into(),
            description: None,
            instructions: "Mix everything.".to_owned(),
        },
    )
    .await?)
}

#[allow(dead_code)]
pub async fn create_ingredient(
    pool: &SqlitePool,
    name: impl Into<String>,
    unit: impl Into<String>,
) -> anyhow::Result<Ingredient> {
    let mut conn = pool.acquire().await?;

    Ok(recipehub_recipe::ingredient::create(
        &mut conn,
        CreateIngredient {
            name: name.into(),
            description: None,
            unit: unit.into(),
        },
    )
    .await?)
}
