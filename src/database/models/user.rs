use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Account record. The password hash never leaves the store layer; the wire
/// shape is `api::format::UserOut`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
