use std::{path::PathBuf, str::FromStr};

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
