//! Wire shapes and the projections that produce them.
//!
//! Recipes have two projections over the same row type: the flat list shape
//! keeps relations as bare ids, the detail shape expands them into full
//! sub-records. These are plain functions, not serializer inheritance.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Ingredient, Recipe, RecipeDetail, Tag, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserOut {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientOut {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagOut {
    pub id: i64,
    pub name: String,
}

/// Flat recipe shape: relations as bare ids.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeListOut {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

/// Nested recipe shape: scalar fields stay flat, relations expand into full
/// sub-records.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetailOut {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tags: Vec<TagOut>,
    pub ingredients: Vec<IngredientOut>,
}

pub fn user_to_out(user: &User) -> UserOut {
    UserOut {
        id: user.id,
        email: user.email.clone(),
    }
}

pub fn ingredient_to_out(ingredient: &Ingredient) -> IngredientOut {
    IngredientOut {
        id: ingredient.id,
        name: ingredient.name.clone(),
    }
}

pub fn tag_to_out(tag: &Tag) -> TagOut {
    TagOut {
        id: tag.id,
        name: tag.name.clone(),
    }
}

pub fn recipe_to_list(recipe: &Recipe) -> RecipeListOut {
    RecipeListOut {
        id: recipe.id,
        title: recipe.title.clone(),
        time_minutes: recipe.time_minutes,
        price: recipe.price,
        tags: recipe.tag_ids.clone(),
        ingredients: recipe.ingredient_ids.clone(),
    }
}

pub fn recipe_to_detail(detail: &RecipeDetail) -> RecipeDetailOut {
    RecipeDetailOut {
        id: detail.recipe.id,
        title: detail.recipe.title.clone(),
        time_minutes: detail.recipe.time_minutes,
        price: detail.recipe.price,
        tags: detail.tags.iter().map(tag_to_out).collect(),
        ingredients: detail.ingredients.iter().map(ingredient_to_out).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: 7,
            title: "sample recipe".to_string(),
            time_minutes: 5,
            price: Decimal::new(300, 2),
            user_id: Uuid::new_v4(),
            tag_ids: vec![1],
            ingredient_ids: vec![2],
        }
    }

    #[test]
    fn list_projection_keeps_relations_as_ids() {
        let value = serde_json::to_value(recipe_to_list(&sample_recipe())).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "sample recipe");
        assert_eq!(value["tags"], json!([1]));
        assert_eq!(value["ingredients"], json!([2]));
    }

    #[test]
    fn detail_projection_expands_relations() {
        let recipe = sample_recipe();
        let owner = recipe.user_id;
        let detail = RecipeDetail {
            recipe,
            tags: vec![Tag {
                id: 1,
                name: "Vegan".to_string(),
                user_id: owner,
            }],
            ingredients: vec![Ingredient {
                id: 2,
                name: "salt".to_string(),
                user_id: owner,
            }],
        };

        let value = serde_json::to_value(recipe_to_detail(&detail)).unwrap();

        // Scalars stay flat, relations become full sub-records
        assert_eq!(value["title"], "sample recipe");
        assert_eq!(value["tags"], json!([{"id": 1, "name": "Vegan"}]));
        assert_eq!(value["ingredients"], json!([{"id": 2, "name": "salt"}]));
    }

    #[test]
    fn price_serializes_as_exact_decimal_string() {
        let value = serde_json::to_value(recipe_to_list(&sample_recipe())).unwrap();
        assert_eq!(value["price"], "3.00");
    }

    #[test]
    fn user_projection_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "salt$hash".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let value = serde_json::to_value(user_to_out(&user)).unwrap();
        assert_eq!(value["email"], "test@example.com");
        assert!(value.get("password_hash").is_none());
    }
}
