use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::format::{user_to_out, UserOut};
use crate::auth::password::hash_password;
use crate::database::store::NewUser;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::AppState;

const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/register - create a new user account
///
/// 201 with the created user (never the password hash), 400 on a malformed
/// email or short password, 409 when the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<UserOut>, ApiError> {
    let email = payload.email.trim().to_ascii_lowercase();

    let mut field_errors = HashMap::new();
    if email.is_empty() || !email.contains('@') {
        field_errors.insert(
            "email".to_string(),
            "must be a valid email address".to_string(),
        );
    }
    if payload.password.chars().count() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Invalid registration payload",
            Some(field_errors),
        ));
    }

    let user = state
        .store
        .create_user(NewUser {
            email,
            password_hash: hash_password(&payload.password),
        })
        .await?;

    tracing::info!(user_id = %user.id, "registered new user");
    Ok(ApiResponse::created(user_to_out(&user)))
}
