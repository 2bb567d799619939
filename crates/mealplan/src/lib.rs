use recipehub_db::{table, types::MealType};
use recipehub_shared::{Error, is_foreign_key_violation};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, prelude::FromRow};
use time::{Date, OffsetDateTime, macros::format_description};
use validator::Validate;

#[derive(FromRow)]
struct MealPlanRow {
    id: i64,
    date: String,
    meal_type: sqlx::types::Text<MealType>,
    user_id: i64,
    recipe_id: i64,
    created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealPlan {
    pub id: i64,
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
    pub meal_type: MealType,
    pub user_id: i64,
    pub recipe_id: i64,
    pub created_at: i64,
}

impl From<MealPlanRow> for MealPlan {
    fn from(row: MealPlanRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            meal_type: row.meal_type.0,
            user_id: row.user_id,
            recipe_id: row.recipe_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMealPlan {
    #[validate(length(equal = 10))]
    pub date: String,
    pub meal_type: MealType,
    pub recipe_id: i64,
}

pub fn parse_date(value: &str) -> recipehub_shared::Result<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| Error::Invalid(format!("Invalid date {value}: {e}")))
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::MealPlan::Id,
            table::MealPlan::Date,
            table::MealPlan::MealType,
            table::MealPlan::UserId,
            table::MealPlan::RecipeId,
            table::MealPlan::CreatedAt,
        ])
        .from(table::MealPlan::Table)
        .to_owned()
}

pub async fn create(
    conn: &mut SqliteConnection,
    user_id: i64,
    input: CreateMealPlan,
) -> recipehub_shared::Result<MealPlan> {
    let date = parse_date(&input.date)?;
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let statement = Query::insert()
        .into_table(table::MealPlan::Table)
        .columns([
            table::MealPlan::Date,
            table::MealPlan::MealType,
            table::MealPlan::UserId,
            table::MealPlan::RecipeId,
            table::MealPlan::CreatedAt,
        ])
        .values_panic([
            date.to_string().into(),
            input.meal_type.to_string().into(),
            user_id.into(),
            input.recipe_id.into(),
            now.into(),
        ])
        .returning_all()
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_as_with::<_, MealPlanRow, _>(&sql, values)
        .fetch_one(&mut *conn)
        .await
    {
        Ok(row) => Ok(row.into()),
        Err(e) if is_foreign_key_violation(&e) => Err(Error::NotFound(format!(
            "User {user_id} or recipe {} not found",
            input.recipe_id
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Meal plans of a user, earliest day first.
pub async fn list_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> recipehub_shared::Result<Vec<MealPlan>> {
    let statement = select()
        .and_where(Expr::col(table::MealPlan::UserId).eq(user_id))
        .order_by(table::MealPlan::Date, Order::Asc)
        .order_by(table::MealPlan::Id, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    let rows = sqlx::query_as_with::<_, MealPlanRow, _>(&sql, values)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(MealPlan::from).collect())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> recipehub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(table::MealPlan::Table)
        .and_where(Expr::col(table::MealPlan::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        recipehub_shared::not_found!("Meal plan {id} not found");
    }

    Ok(())
}
