use recipehub_db::table;
use recipehub_shared::{Error, is_unique_violation};
use sea_query::{Expr, ExprTrait, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use time::OffsetDateTime;
use validator::Validate;

use crate::password::{hash_password, verify_password};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email, length(max = 200))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub enum FindType {
    Id(i64),
    Email(String),
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::User::Id,
            table::User::Email,
            table::User::Name,
            table::User::HashedPassword,
            table::User::IsActive,
            table::User::CreatedAt,
        ])
        .from(table::User::Table)
        .to_owned()
}

/// Registers an active user. The email must not be taken yet.
pub async fn create(conn: &mut SqliteConnection, input: CreateUser) -> recipehub_shared::Result<User> {
    let hashed_password = hash_password(&input.password)?;
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let statement = Query::insert()
        .into_table(table::User::Table)
        .columns([
            table::User::Email,
            table::User::Name,
            table::User::HashedPassword,
            table::User::IsActive,
            table::User::CreatedAt,
        ])
        .values_panic([
            input.email.into(),
            input.name.into(),
            hashed_password.into(),
            true.into(),
            now.into(),
        ])
        .returning_all()
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_as_with::<_, User, _>(&sql, values)
        .fetch_one(&mut *conn)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User registered");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => {
            Err(Error::Conflict("Email already registered".to_owned()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find(
    conn: &mut SqliteConnection,
    find_type: FindType,
) -> recipehub_shared::Result<Option<User>> {
    let mut statement = select().limit(1).to_owned();

    match find_type {
        FindType::Id(id) => statement.and_where(Expr::col(table::User::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(table::User::Email).eq(email)),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, User, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> recipehub_shared::Result<Option<User>> {
    find(conn, FindType::Id(id)).await
}

pub async fn find_by_email(
    conn: &mut SqliteConnection,
    email: impl Into<String>,
) -> recipehub_shared::Result<Option<User>> {
    find(conn, FindType::Email(email.into())).await
}

/// Returns the user owning these credentials. Inactive accounts never authenticate.
pub async fn authenticate(
    conn: &mut SqliteConnection,
    email: impl Into<String>,
    password: &str,
) -> recipehub_shared::Result<Option<User>> {
    let Some(user) = find_by_email(conn, email).await? else {
        return Ok(None);
    };

    if !user.is_active {
        tracing::info!(user_id = user.id, "Rejected login for inactive user");
        return Ok(None);
    }

    if !verify_password(password, &user.hashed_password)? {
        return Ok(None);
    }

    Ok(Some(user))
}

pub async fn set_active(
    conn: &mut SqliteConnection,
    id: i64,
    is_active: bool,
) -> recipehub_shared::Result<()> {
    let statement = Query::update()
        .table(table::User::Table)
        .value(table::User::IsActive, is_active)
        .and_where(Expr::col(table::User::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        recipehub_shared::not_found!("User {id} not found");
    }

    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> recipehub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(table::User::Table)
        .and_where(Expr::col(table::User::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        recipehub_shared::not_found!("User {id} not found");
    }

    Ok(())
}
