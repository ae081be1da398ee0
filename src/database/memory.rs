use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Ingredient, Recipe, RecipeDetail, Tag, User};
use crate::database::store::{NewRecipe, NewUser, Store, StoreError};

/// In-memory store with the same contract as `PgStore`, including ordering
/// and ownership-filtering semantics. Backs the integration tests and
/// `--memory` runs.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    users: Vec<User>,
    ingredients: Vec<Ingredient>,
    tags: Vec<Tag>,
    recipes: Vec<Recipe>,
    next_ingredient_id: i64,
    next_tag_id: i64,
    next_recipe_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                ingredients: Vec::new(),
                tags: Vec::new(),
                recipes: Vec::new(),
                next_ingredient_id: 1,
                next_tag_id: 1,
                next_recipe_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!(
                "email already registered: {}",
                new.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_ingredients(&self, owner: Uuid) -> Result<Vec<Ingredient>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Ingredient> = inner
            .ingredients
            .iter()
            .filter(|i| i.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(rows)
    }

    async fn create_ingredient(&self, owner: Uuid, name: &str) -> Result<Ingredient, StoreError> {
        let mut inner = self.inner.write().await;
        let ingredient = Ingredient {
            id: inner.next_ingredient_id,
            name: name.to_string(),
            user_id: owner,
        };
        inner.next_ingredient_id += 1;
        inner.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    async fn ingredient_exists(&self, owner: Uuid, name: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .ingredients
            .iter()
            .any(|i| i.user_id == owner && i.name == name))
    }

    async fn list_tags(&self, owner: Uuid) -> Result<Vec<Tag>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Tag> = inner
            .tags
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(rows)
    }

    async fn create_tag(&self, owner: Uuid, name: &str) -> Result<Tag, StoreError> {
        let mut inner = self.inner.write().await;
        let tag = Tag {
            id: inner.next_tag_id,
            name: name.to_string(),
            user_id: owner,
        };
        inner.next_tag_id += 1;
        inner.tags.push(tag.clone());
        Ok(tag)
    }

    async fn list_recipes(&self, owner: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Recipe> = inner
            .recipes
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn create_recipe(&self, owner: Uuid, new: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tag_ids = new.tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();

        let mut ingredient_ids = new.ingredient_ids;
        ingredient_ids.sort_unstable();
        ingredient_ids.dedup();

        let mut inner = self.inner.write().await;

        // Attached relations must exist; owner matching is deliberately not
        // enforced here.
        if let Some(missing) = tag_ids
            .iter()
            .find(|id| !inner.tags.iter().any(|t| t.id == **id))
        {
            return Err(StoreError::InvalidReference { kind: "tag", id: *missing });
        }
        if let Some(missing) = ingredient_ids
            .iter()
            .find(|id| !inner.ingredients.iter().any(|i| i.id == **id))
        {
            return Err(StoreError::InvalidReference { kind: "ingredient", id: *missing });
        }

        let recipe = Recipe {
            id: inner.next_recipe_id,
            title: new.title,
            time_minutes: new.time_minutes,
            price: new.price,
            user_id: owner,
            tag_ids,
            ingredient_ids,
        };
        inner.next_recipe_id += 1;
        inner.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn recipe_detail(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<RecipeDetail>, StoreError> {
        let inner = self.inner.read().await;

        let Some(recipe) = inner
            .recipes
            .iter()
            .find(|r| r.id == id && r.user_id == owner)
            .cloned()
        else {
            return Ok(None);
        };

        let tags = recipe
            .tag_ids
            .iter()
            .filter_map(|tid| inner.tags.iter().find(|t| t.id == *tid).cloned())
            .collect();
        let ingredients = recipe
            .ingredient_ids
            .iter()
            .filter_map(|iid| inner.ingredients.iter().find(|i| i.id == *iid).cloned())
            .collect();

        Ok(Some(RecipeDetail {
            recipe,
            tags,
            ingredients,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_recipe(title: &str) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            time_minutes: 5,
            price: Decimal::new(300, 2),
            tag_ids: vec![],
            ingredient_ids: vec![],
        }
    }

    #[tokio::test]
    async fn ingredient_list_is_owner_filtered_and_name_descending() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.create_ingredient(alice, "carrot").await.unwrap();
        store.create_ingredient(alice, "salt").await.unwrap();
        store.create_ingredient(bob, "pepper").await.unwrap();

        let rows = store.list_ingredients(alice).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["salt", "carrot"]);
    }

    #[tokio::test]
    async fn ingredient_exists_checks_owner_and_name() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.create_ingredient(alice, "salt").await.unwrap();

        assert!(store.ingredient_exists(alice, "salt").await.unwrap());
        assert!(!store.ingredient_exists(alice, "pepper").await.unwrap());
        assert!(!store.ingredient_exists(bob, "salt").await.unwrap());
    }

    #[tokio::test]
    async fn recipe_list_is_id_descending() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();

        let first = store.create_recipe(alice, new_recipe("one")).await.unwrap();
        let second = store.create_recipe(alice, new_recipe("two")).await.unwrap();

        let rows = store.list_recipes(alice).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);
    }

    #[tokio::test]
    async fn recipe_create_rejects_unknown_relation_ids() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();

        let mut recipe = new_recipe("bad");
        recipe.tag_ids = vec![99];
        let err = store.create_recipe(alice, recipe).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidReference { kind: "tag", id: 99 }
        ));
    }

    #[tokio::test]
    async fn recipe_detail_expands_relations_and_filters_by_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let tag = store.create_tag(alice, "Vegan").await.unwrap();
        let ingredient = store.create_ingredient(alice, "tofu").await.unwrap();

        let mut recipe = new_recipe("curry");
        recipe.tag_ids = vec![tag.id];
        recipe.ingredient_ids = vec![ingredient.id];
        let created = store.create_recipe(alice, recipe).await.unwrap();

        let detail = store
            .recipe_detail(alice, created.id)
            .await
            .unwrap()
            .expect("detail");
        assert_eq!(detail.tags, vec![tag]);
        assert_eq!(detail.ingredients, vec![ingredient]);

        // Same id through another principal looks absent
        assert!(store.recipe_detail(bob, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let new = NewUser {
            email: "test@example.com".to_string(),
            password_hash: "salt$hash".to_string(),
        };

        store.create_user(new.clone()).await.unwrap();
        let err = store.create_user(new).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
