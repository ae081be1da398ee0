use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::format::{user_to_out, UserOut};
use crate::auth::password::verify_password;
use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserOut,
    pub expires_in: u64,
}

/// POST /auth/login - authenticate and receive a bearer token
///
/// Unknown email and wrong password produce the same 401 so the response
/// does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    let email = payload.email.trim().to_ascii_lowercase();

    let user = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid email or password"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::unauthorized("invalid email or password"));
    }

    let token = generate_jwt(Claims::new(user.id, user.email.clone())).map_err(|e| {
        tracing::error!("failed to issue token: {}", e);
        ApiError::internal_server_error("failed to issue token")
    })?;

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: user_to_out(&user),
        expires_in: config::config().security.jwt_expiry_hours * 3600,
    }))
}
