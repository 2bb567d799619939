use recipehub_db::table;
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIngredient {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
}

/// Fields left out keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateIngredient {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::Ingredient::Id,
            table::Ingredient::Name,
            table::Ingredient::Description,
            table::Ingredient::Unit,
            table::Ingredient::CreatedAt,
            table::Ingredient::UpdatedAt,
        ])
        .from(table::Ingredient::Table)
        .to_owned()
}

pub async fn create(
    conn: &mut SqliteConnection,
    input: CreateIngredient,
) -> recipehub_shared::Result<Ingredient> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(table::Ingredient::Table)
        .columns([
            table::Ingredient::Name,
            table::Ingredient::Description,
            table::Ingredient::Unit,
            table::Ingredient::CreatedAt,
            table::Ingredient::UpdatedAt,
        ])
        .values_panic([
            input.name.into(),
            input.description.into(),
            input.unit.into(),
            now.into(),
            now.into(),
        ])
        .returning_all()
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
        .fetch_one(&mut *conn)
        .await?)
}

pub async fn list(conn: &mut SqliteConnection) -> recipehub_shared::Result<Vec<Ingredient>> {
    let statement = select()
        .order_by(table::Ingredient::Name, Order::Asc)
        .order_by(table::Ingredient::Id, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?)
}

pub async fn find(
    conn: &mut SqliteConnection,
    id: i64,
) -> recipehub_shared::Result<Option<Ingredient>> {
    let statement = select()
        .and_where(Expr::col(table::Ingredient::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: UpdateIngredient,
) -> recipehub_shared::Result<Ingredient> {
    let mut statement = Query::update()
        .table(table::Ingredient::Table)
        .value(
            table::Ingredient::UpdatedAt,
            OffsetDateTime::now_utc().unix_timestamp(),
        )
        .and_where(Expr::col(table::Ingredient::Id).eq(id))
        .returning_all()
        .to_owned();

    if let Some(name) = input.name {
        statement.value(table::Ingredient::Name, name);
    }

    if let Some(description) = input.description {
        statement.value(table::Ingredient::Description, description);
    }

    if let Some(unit) = input.unit {
        statement.value(table::Ingredient::Unit, unit);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?
    {
        Some(ingredient) => Ok(ingredient),
        None => recipehub_shared::not_found!("Ingredient {id} not found"),
    }
}

/// Deleting an ingredient drops it from every recipe using it.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> recipehub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(table::Ingredient::Table)
        .and_where(Expr::col(table::Ingredient::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        recipehub_shared::not_found!("Ingredient {id} not found");
    }

    tracing::info!(ingredient_id = id, "Ingredient deleted");

    Ok(())
}
