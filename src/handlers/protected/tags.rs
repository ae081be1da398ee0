use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use super::require_non_blank;
use crate::api::format::{tag_to_out, TagOut};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TagCreateRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /api/tags - current user's tags, name descending
pub async fn tag_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<TagOut>>, ApiError> {
    let rows = state.store.list_tags(auth.user_id).await?;
    Ok(ApiResponse::success(rows.iter().map(tag_to_out).collect()))
}

/// POST /api/tags - create a tag owned by the current user
pub async fn tag_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<TagCreateRequest>,
) -> Result<ApiResponse<TagOut>, ApiError> {
    require_non_blank("name", &payload.name)?;

    let row = state
        .store
        .create_tag(auth.user_id, payload.name.trim())
        .await?;
    Ok(ApiResponse::created(tag_to_out(&row)))
}
