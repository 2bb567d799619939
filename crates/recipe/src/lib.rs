//! Recipes, the ingredient catalogue and the quantities linking them.

pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;

pub use ingredient::Ingredient;
pub use recipe::Recipe;
pub use recipe_ingredient::RecipeIngredient;
