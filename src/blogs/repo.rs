use sqlx::PgPool;
use uuid::Uuid;

use crate::blogs::repo_types::{Blog, BlogWithAuthor};
use crate::error::ApiError;

pub async fn insert(
    db: &PgPool,
    author_id: Uuid,
    title: &str,
    synopsis: &str,
    content: &str,
    featured_image: Option<&str>,
) -> Result<Blog, ApiError> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (author_id, title, synopsis, content, featured_image)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, author_id, title, synopsis, content, featured_image,
                  is_deleted, created_at, updated_at
        "#,
    )
    .bind(author_id)
    .bind(title)
    .bind(synopsis)
    .bind(content)
    .bind(featured_image)
    .fetch_one(db)
    .await?;
    Ok(blog)
}

/// All non-deleted posts, newest first, with author display fields.
pub async fn list_all(db: &PgPool) -> Result<Vec<BlogWithAuthor>, ApiError> {
    let rows = sqlx::query_as::<_, BlogWithAuthor>(
        r#"
        SELECT b.id, b.author_id, b.title, b.synopsis, b.content, b.featured_image,
               b.created_at, b.updated_at,
               u.first_name AS author_first_name,
               u.last_name  AS author_last_name,
               u.username   AS author_username
        FROM blogs b
        JOIN users u ON u.id = b.author_id
        WHERE b.is_deleted = FALSE
        ORDER BY b.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get_by_id(db: &PgPool, id: Uuid) -> Result<Option<BlogWithAuthor>, ApiError> {
    let row = sqlx::query_as::<_, BlogWithAuthor>(
        r#"
        SELECT b.id, b.author_id, b.title, b.synopsis, b.content, b.featured_image,
               b.created_at, b.updated_at,
               u.first_name AS author_first_name,
               u.last_name  AS author_last_name,
               u.username   AS author_username
        FROM blogs b
        JOIN users u ON u.id = b.author_id
        WHERE b.id = $1 AND b.is_deleted = FALSE
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Ownership-scoped partial update in a single conditional statement, so a
/// concurrent soft delete cannot slip between a check and the write. Zero
/// rows means "not yours or not there" and the caller must not distinguish.
pub async fn update_owned(
    db: &PgPool,
    author_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    synopsis: Option<&str>,
    content: Option<&str>,
    featured_image: Option<&str>,
) -> Result<Option<Blog>, ApiError> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        UPDATE blogs
        SET title          = COALESCE($3, title),
            synopsis       = COALESCE($4, synopsis),
            content        = COALESCE($5, content),
            featured_image = COALESCE($6, featured_image),
            updated_at     = now()
        WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE
        RETURNING id, author_id, title, synopsis, content, featured_image,
                  is_deleted, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(author_id)
    .bind(title)
    .bind(synopsis)
    .bind(content)
    .bind(featured_image)
    .fetch_optional(db)
    .await?;
    Ok(blog)
}

/// Flip the soft-delete flag, same ownership condition as `update_owned`.
/// Returns whether a row was affected. Deleted posts stay in the table.
pub async fn soft_delete_owned(
    db: &PgPool,
    author_id: Uuid,
    id: Uuid,
) -> Result<bool, ApiError> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        UPDATE blogs
        SET is_deleted = TRUE, updated_at = now()
        WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(author_id)
    .fetch_optional(db)
    .await?;
    Ok(row.is_some())
}
