use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::blogs::repo_types::{Blog, BlogWithAuthor};

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub synopsis: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// Denormalized author display fields. The author id only appears on the
/// detail view.
#[derive(Debug, Serialize)]
pub struct AuthorSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub synopsis: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author: AuthorSummary,
}

impl BlogResponse {
    pub fn list_item(row: BlogWithAuthor) -> Self {
        Self::from_row(row, false)
    }

    pub fn detail(row: BlogWithAuthor) -> Self {
        Self::from_row(row, true)
    }

    fn from_row(row: BlogWithAuthor, with_author_id: bool) -> Self {
        Self {
            id: row.id,
            title: row.title,
            synopsis: row.synopsis,
            content: row.content,
            featured_image: row.featured_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: AuthorSummary {
                id: with_author_id.then_some(row.author_id),
                first_name: row.author_first_name,
                last_name: row.author_last_name,
                username: row.author_username,
            },
        }
    }

    /// For create/update responses the acting identity IS the author, so
    /// the summary comes straight from the session claims.
    pub fn owned(blog: Blog, claims: &Claims) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            synopsis: blog.synopsis,
            content: blog.content,
            featured_image: blog.featured_image,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            author: AuthorSummary {
                id: Some(blog.author_id),
                first_name: claims.first_name.clone(),
                last_name: claims.last_name.clone(),
                username: claims.username.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> BlogWithAuthor {
        let now = OffsetDateTime::now_utc();
        BlogWithAuthor {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "Hello".into(),
            synopsis: "syn".into(),
            content: "body".into(),
            featured_image: None,
            created_at: now,
            updated_at: now,
            author_first_name: "Alice".into(),
            author_last_name: "Wonder".into(),
            author_username: "alice".into(),
        }
    }

    #[test]
    fn list_item_omits_author_id() {
        let json = serde_json::to_string(&BlogResponse::list_item(row())).unwrap();
        assert!(json.contains(r#""username":"alice""#));
        assert!(!json.contains(r#""author":{"id""#));
    }

    #[test]
    fn detail_includes_author_id() {
        let r = row();
        let author_id = r.author_id;
        let json = serde_json::to_string(&BlogResponse::detail(r)).unwrap();
        assert!(json.contains(&author_id.to_string()));
    }

    #[test]
    fn absent_featured_image_is_omitted() {
        let json = serde_json::to_string(&BlogResponse::list_item(row())).unwrap();
        assert!(!json.contains("featured_image"));
    }

    #[test]
    fn update_request_supports_partial_bodies() {
        let req: UpdateBlogRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("New"));
        assert!(req.synopsis.is_none());
        assert!(req.content.is_none());
        assert!(req.image_url.is_none());
    }
}
