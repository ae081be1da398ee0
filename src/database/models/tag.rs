use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub user_id: Uuid,
}
