use recipehub_db::table;
use recipehub_shared::{Error, is_foreign_key_violation};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub user_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipe {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub instructions: String,
}

/// The owner is not part of the update: a recipe stays with the user who created it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecipe {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub instructions: Option<String>,
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::Recipe::Id,
            table::Recipe::Title,
            table::Recipe::Description,
            table::Recipe::Instructions,
            table::Recipe::UserId,
            table::Recipe::CreatedAt,
            table::Recipe::UpdatedAt,
        ])
        .from(table::Recipe::Table)
        .to_owned()
}

pub async fn create(
    conn: &mut SqliteConnection,
    user_id: i64,
    input: CreateRecipe,
) -> recipehub_shared::Result<Recipe> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(table::Recipe::Table)
        .columns([
            table::Recipe::Title,
            table::Recipe::Description,
            table::Recipe::Instructions,
            table::Recipe::UserId,
            table::Recipe::CreatedAt,
            table::Recipe::UpdatedAt,
        ])
        .values_panic([
            input.title.into(),
            input.description.into(),
            input.instructions.into(),
            user_id.into(),
            now.into(),
            now.into(),
        ])
        .returning_all()
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_as_with::<_, Recipe, _>(&sql, values)
        .fetch_one(&mut *conn)
        .await
    {
        Ok(recipe) => Ok(recipe),
        Err(e) if is_foreign_key_violation(&e) => {
            Err(Error::NotFound(format!("User {user_id} not found")))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find(conn: &mut SqliteConnection, id: i64) -> recipehub_shared::Result<Option<Recipe>> {
    let statement = select()
        .and_where(Expr::col(table::Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Recipe, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> recipehub_shared::Result<Vec<Recipe>> {
    let statement = select()
        .and_where(Expr::col(table::Recipe::UserId).eq(user_id))
        .order_by(table::Recipe::CreatedAt, Order::Desc)
        .order_by(table::Recipe::Id, Order::Desc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Recipe, _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: UpdateRecipe,
) -> recipehub_shared::Result<Recipe> {
    let mut statement = Query::update()
        .table(table::Recipe::Table)
        .value(
            table::Recipe::UpdatedAt,
            OffsetDateTime::now_utc().unix_timestamp(),
        )
        .and_where(Expr::col(table::Recipe::Id).eq(id))
        .returning_all()
        .to_owned();

    if let Some(title) = input.title {
        statement.value(table::Recipe::Title, title);
    }

    if let Some(description) = input.description {
        statement.value(table::Recipe::Description, description);
    }

    if let Some(instructions) = input.instructions {
        statement.value(table::Recipe::Instructions, instructions);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_as_with::<_, Recipe, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?
    {
        Some(recipe) => Ok(recipe),
        None => recipehub_shared::not_found!("Recipe {id} not found"),
    }
}

/// Removes the recipe together with its ingredient quantities and meal plan entries.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> recipehub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(table::Recipe::Table)
        .and_where(Expr::col(table::Recipe::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        recipehub_shared::not_found!("Recipe {id} not found");
    }

    Ok(())
}
