use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use super::require_non_blank;
use crate::api::format::{ingredient_to_out, IngredientOut};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientCreateRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /api/ingredients - current user's ingredients, name descending
pub async fn ingredient_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<IngredientOut>>, ApiError> {
    let rows = state.store.list_ingredients(auth.user_id).await?;
    Ok(ApiResponse::success(
        rows.iter().map(ingredient_to_out).collect(),
    ))
}

/// POST /api/ingredients - create an ingredient owned by the current user
pub async fn ingredient_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<IngredientCreateRequest>,
) -> Result<ApiResponse<IngredientOut>, ApiError> {
    require_non_blank("name", &payload.name)?;

    let row = state
        .store
        .create_ingredient(auth.user_id, payload.name.trim())
        .await?;
    Ok(ApiResponse::created(ingredient_to_out(&row)))
}
