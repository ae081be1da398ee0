use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::require_non_blank;
use crate::api::format::{recipe_to_detail, recipe_to_list, RecipeDetailOut, RecipeListOut};
use crate::database::store::NewRecipe;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecipeCreateRequest {
    #[serde(default)]
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub ingredients: Vec<i64>,
}

/// GET /api/recipes - current user's recipes in flat form, id descending
pub async fn recipe_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<RecipeListOut>>, ApiError> {
    let rows = state.store.list_recipes(auth.user_id).await?;
    Ok(ApiResponse::success(
        rows.iter().map(recipe_to_list).collect(),
    ))
}

/// POST /api/recipes - create a recipe owned by the current user
///
/// Attached tags/ingredients must exist but are not required to share the
/// recipe's owner.
pub async fn recipe_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<RecipeCreateRequest>,
) -> Result<ApiResponse<RecipeListOut>, ApiError> {
    require_non_blank("title", &payload.title)?;

    let mut field_errors = HashMap::new();
    if payload.time_minutes < 0 {
        field_errors.insert(
            "time_minutes".to_string(),
            "must not be negative".to_string(),
        );
    }
    if payload.price.is_sign_negative() {
        field_errors.insert("price".to_string(), "must not be negative".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Validation failed",
            Some(field_errors),
        ));
    }

    let recipe = state
        .store
        .create_recipe(
            auth.user_id,
            NewRecipe {
                title: payload.title.trim().to_string(),
                time_minutes: payload.time_minutes,
                price: payload.price,
                tag_ids: payload.tags,
                ingredient_ids: payload.ingredients,
            },
        )
        .await?;

    Ok(ApiResponse::created(recipe_to_list(&recipe)))
}

/// GET /api/recipes/:id - nested detail view with relations expanded
///
/// Owner-filtered lookup: recipes owned by someone else 404 the same way a
/// nonexistent id does.
pub async fn recipe_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<RecipeDetailOut>, ApiError> {
    let detail = state
        .store
        .recipe_detail(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("recipe {} not found", id)))?;

    Ok(ApiResponse::success(recipe_to_detail(&detail)))
}
