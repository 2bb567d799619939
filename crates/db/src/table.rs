use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    #[iden = "users"]
    Table,
    Id,
    Email,
    Name,
    HashedPassword,
    IsActive,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Recipe {
    #[iden = "recipes"]
    Table,
    Id,
    Title,
    Description,
    Instructions,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum Ingredient {
    #[iden = "ingredients"]
    Table,
    Id,
    Name,
    Description,
    Unit,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum RecipeIngredient {
    #[iden = "recipe_ingredients"]
    Table,
    RecipeId,
    IngredientId,
    Quantity,
}

#[derive(Iden, Clone)]
pub enum MealPlan {
    #[iden = "meal_plans"]
    Table,
    Id,
    Date,
    MealType,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum UserOtp {
    #[iden = "user_otps"]
    Table,
    Email,
    Code,
    ExpiresAt,
}
