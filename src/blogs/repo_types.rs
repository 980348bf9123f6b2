use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Blog post record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub synopsis: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Blog row joined with its author's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct BlogWithAuthor {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub synopsis: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_username: String,
}
