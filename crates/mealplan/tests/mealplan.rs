use recipehub_db::types::MealType;
use recipehub_mealplan::CreateMealPlan;
use temp_dir::TempDir;

mod helpers;

fn plan(date: &str, meal_type: MealType, recipe_id: i64) -> CreateMealPlan {
    CreateMealPlan {
        date: date.to_owned(),
        meal_type,
        recipe_id,
    }
}

#[tokio::test]
async fn list_by_user_is_ordered_by_date() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let john = helpers::create_user(&pool, "john").await?;
    let jane = helpers::create_user(&pool, "jane").await?;
    let recipe = helpers::create_recipe(&pool, john.id, "Pancakes").await?;

    let mut conn = pool.acquire().await?;
    recipehub_mealplan::create(&mut conn, john.id, plan("2024-03-02", MealType::Dinner, recipe.id))
        .await?;
    recipehub_mealplan::create(&mut conn, john.id, plan("2024-03-01", MealType::Breakfast, recipe.id))
        .await?;
    recipehub_mealplan::create(&mut conn, jane.id, plan("2024-02-01", MealType::Lunch, recipe.id))
        .await?;

    let plans = recipehub_mealplan::list_by_user(&mut conn, john.id).await?;
    let summary = plans
        .iter()
        .map(|p| (p.date.as_str(), p.meal_type))
        .collect::<Vec<_>>();

    assert_eq!(
        summary,
        vec![
            ("2024-03-01", MealType::Breakfast),
            ("2024-03-02", MealType::Dinner)
        ]
    );

    Ok(())
}

#[tokio::test]
async fn create_rejects_unknown_recipe_and_bad_dates() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let john = helpers::create_user(&pool, "john").await?;
    let mut conn = pool.acquire().await?;

    let err = recipehub_mealplan::create(&mut conn, john.id, plan("2024-03-01", MealType::Snack, 42))
        .await
        .unwrap_err();
    assert!(matches!(err, recipehub_shared::Error::NotFound(_)));

    let err = recipehub_mealplan::create(&mut conn, john.id, plan("2024-13-01", MealType::Snack, 42))
        .await
        .unwrap_err();
    assert!(matches!(err, recipehub_shared::Error::Invalid(_)));

    Ok(())
}

#[tokio::test]
async fn plans_disappear_with_their_recipe_or_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let john = helpers::create_user(&pool, "john").await?;
    let jane = helpers::create_user(&pool, "jane").await?;
    let pancakes = helpers::create_recipe(&pool, john.id, "Pancakes").await?;
    let soup = helpers::create_recipe(&pool, john.id, "Soup").await?;

    let mut conn = pool.acquire().await?;
    recipehub_mealplan::create(&mut conn, jane.id, plan("2024-03-01", MealType::Lunch, pancakes.id))
        .await?;
    recipehub_mealplan::create(&mut conn, jane.id, plan("2024-03-02", MealType::Lunch, soup.id))
        .await?;

    recipehub_recipe::recipe::delete(&mut conn, pancakes.id).await?;
    let plans = recipehub_mealplan::list_by_user(&mut conn, jane.id).await?;
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].recipe_id, soup.id);

    recipehub_user::delete(&mut conn, jane.id).await?;
    assert!(
        recipehub_mealplan::list_by_user(&mut conn, jane.id)
            .await?
            .is_empty()
    );

    Ok(())
}

#[tokio::test]
async fn delete_missing_plan_is_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let mut conn = pool.acquire().await?;

    let err = recipehub_mealplan::delete(&mut conn, 5).await.unwrap_err();

    assert_eq!(err.to_string(), "Meal plan 5 not found");

    Ok(())
}
