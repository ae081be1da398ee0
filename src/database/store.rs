use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Ingredient, Recipe, RecipeDetail, Tag, User};

/// Errors from store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unknown {kind} id: {id}")]
    InvalidReference { kind: &'static str, id: i64 },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// New account record. The caller hashes the password; the store never sees
/// plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tag_ids: Vec<i64>,
    pub ingredient_ids: Vec<i64>,
}

/// Persistence seam for the whole service. Every operation on owned data
/// takes the owning principal explicitly; ownership filtering happens in the
/// store query itself, never after the fact in a handler.
///
/// Ordering contracts:
/// - ingredient and tag lists: name descending
/// - recipe lists: id descending
#[async_trait]
pub trait Store: Send + Sync {
    async fn health(&self) -> Result<(), StoreError>;

    // Users
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    // Ingredients
    async fn list_ingredients(&self, owner: Uuid) -> Result<Vec<Ingredient>, StoreError>;
    async fn create_ingredient(&self, owner: Uuid, name: &str) -> Result<Ingredient, StoreError>;
    async fn ingredient_exists(&self, owner: Uuid, name: &str) -> Result<bool, StoreError>;

    // Tags
    async fn list_tags(&self, owner: Uuid) -> Result<Vec<Tag>, StoreError>;
    async fn create_tag(&self, owner: Uuid, name: &str) -> Result<Tag, StoreError>;

    // Recipes
    async fn list_recipes(&self, owner: Uuid) -> Result<Vec<Recipe>, StoreError>;
    async fn create_recipe(&self, owner: Uuid, new: NewRecipe) -> Result<Recipe, StoreError>;

    /// Owner-filtered single-recipe fetch with relations fully loaded.
    /// Rows owned by someone else are indistinguishable from absent ones.
    async fn recipe_detail(&self, owner: Uuid, id: i64) -> Result<Option<RecipeDetail>, StoreError>;
}
