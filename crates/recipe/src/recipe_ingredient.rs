use recipehub_db::table;
use recipehub_shared::{Error, is_foreign_key_violation};
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use validator::Validate;

/// An ingredient line of a recipe, with the catalogue name and unit.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeIngredient {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    pub unit: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SetQuantity {
    pub quantity: Option<i64>,
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            (table::RecipeIngredient::Table, table::RecipeIngredient::RecipeId),
            (table::RecipeIngredient::Table, table::RecipeIngredient::IngredientId),
            (table::RecipeIngredient::Table, table::RecipeIngredient::Quantity),
        ])
        .columns([
            (table::Ingredient::Table, table::Ingredient::Name),
            (table::Ingredient::Table, table::Ingredient::Unit),
        ])
        .from(table::RecipeIngredient::Table)
        .inner_join(
            table::Ingredient::Table,
            Expr::col((table::Ingredient::Table, table::Ingredient::Id)).equals((
                table::RecipeIngredient::Table,
                table::RecipeIngredient::IngredientId,
            )),
        )
        .to_owned()
}

/// Adds the ingredient to the recipe or replaces its quantity.
pub async fn set_quantity(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredient_id: i64,
    quantity: Option<i64>,
) -> recipehub_shared::Result<RecipeIngredient> {
    let statement = Query::insert()
        .into_table(table::RecipeIngredient::Table)
        .columns([
            table::RecipeIngredient::RecipeId,
            table::RecipeIngredient::IngredientId,
            table::RecipeIngredient::Quantity,
        ])
        .values_panic([recipe_id.into(), ingredient_id.into(), quantity.into()])
        .on_conflict(
            OnConflict::columns([
                table::RecipeIngredient::RecipeId,
                table::RecipeIngredient::IngredientId,
            ])
            .update_column(table::RecipeIngredient::Quantity)
            .to_owned(),
        )
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    if let Err(e) = sqlx::query_with(&sql, values).execute(&mut *conn).await {
        if is_foreign_key_violation(&e) {
            return Err(Error::NotFound(format!(
                "Recipe {recipe_id} or ingredient {ingredient_id} not found"
            )));
        }

        return Err(e.into());
    }

    match find(conn, recipe_id, ingredient_id).await? {
        Some(line) => Ok(line),
        None => recipehub_shared::not_found!(
            "Recipe {} or ingredient {} not found",
            recipe_id,
            ingredient_id
        ),
    }
}

pub async fn find(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredient_id: i64,
) -> recipehub_shared::Result<Option<RecipeIngredient>> {
    let statement = select()
        .and_where(
            Expr::col((table::RecipeIngredient::Table, table::RecipeIngredient::RecipeId))
                .eq(recipe_id),
        )
        .and_where(
            Expr::col((
                table::RecipeIngredient::Table,
                table::RecipeIngredient::IngredientId,
            ))
            .eq(ingredient_id),
        )
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, RecipeIngredient, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn list(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> recipehub_shared::Result<Vec<RecipeIngredient>> {
    let statement = select()
        .and_where(
            Expr::col((table::RecipeIngredient::Table, table::RecipeIngredient::RecipeId))
                .eq(recipe_id),
        )
        .order_by((table::Ingredient::Table, table::Ingredient::Name), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, RecipeIngredient, _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?)
}

pub async fn remove(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredient_id: i64,
) -> recipehub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(table::RecipeIngredient::Table)
        .and_where(Expr::col(table::RecipeIngredient::RecipeId).eq(recipe_id))
        .and_where(Expr::col(table::RecipeIngredient::IngredientId).eq(ingredient_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        recipehub_shared::not_found!("Ingredient {ingredient_id} is not part of recipe {recipe_id}");
    }

    Ok(())
}
