use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::{Ingredient, Tag};

/// Recipe row with its many-to-many relations as bare ids. This is the shape
/// list queries produce; `RecipeDetail` carries the expanded relations.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub user_id: Uuid,
    pub tag_ids: Vec<i64>,
    pub ingredient_ids: Vec<i64>,
}

/// A recipe with its related tag and ingredient rows fully loaded.
/// Assembled by the store for the detail endpoint.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}
