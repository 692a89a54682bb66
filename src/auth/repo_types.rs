use sqlx::FromRow;
use time::OffsetDateTime;

/// Administrative account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String, // PHC string
    pub created_at: OffsetDateTime,
}
