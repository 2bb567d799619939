mod ingredient;
mod meal_plan;
mod recipe;
mod recipe_ingredient;
mod user;
mod user_otp;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "recipehub",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe::CreateIdx2,
        ingredient::CreateTable,
        ingredient::CreateIdx1,
        recipe_ingredient::CreateTable,
        meal_plan::CreateTable,
        meal_plan::CreateIdx1,
        user_otp::CreateTable
    ]
);
