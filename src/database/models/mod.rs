pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::Ingredient;
pub use recipe::{Recipe, RecipeDetail};
pub use tag::Tag;
pub use user::User;
