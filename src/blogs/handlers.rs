use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    blogs::dto::{BlogResponse, CreateBlogRequest, UpdateBlogRequest},
    blogs::repo,
    error::ApiError,
    state::AppState,
};

use crate::auth::dto::MessageResponse;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs))
        .route("/blogs/:id", get(get_blog))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", post(create_blog))
        .route("/blogs/:id", put(update_blog).delete(delete_blog))
}

#[instrument(skip(state, claims, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(mut payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), ApiError> {
    payload.title = payload.title.trim().to_string();
    payload.synopsis = payload.synopsis.trim().to_string();
    payload.content = payload.content.trim().to_string();

    for (field, value) in [
        ("title", &payload.title),
        ("synopsis", &payload.synopsis),
        ("content", &payload.content),
    ] {
        if value.is_empty() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    }

    let blog = repo::insert(
        &state.db,
        claims.sub,
        &payload.title,
        &payload.synopsis,
        &payload.content,
        payload.image_url.as_deref(),
    )
    .await?;

    info!(blog_id = %blog.id, author_id = %claims.sub, "blog created");
    Ok((
        StatusCode::CREATED,
        Json(BlogResponse::owned(blog, &claims)),
    ))
}

#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let rows = repo::list_all(&state.db).await?;
    let items = rows.into_iter().map(BlogResponse::list_item).collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogResponse>, ApiError> {
    let row = repo::get_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;
    Ok(Json(BlogResponse::detail(row)))
}

#[instrument(skip(state, claims, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, ApiError> {
    for (field, value) in [
        ("title", &mut payload.title),
        ("synopsis", &mut payload.synopsis),
        ("content", &mut payload.content),
    ] {
        if let Some(v) = value {
            *v = v.trim().to_string();
            if v.is_empty() {
                return Err(ApiError::Validation(format!("{field} cannot be blank")));
            }
        }
    }

    // A miss here covers both "not there" and "not yours"; the client sees
    // one NotFound either way.
    let blog = repo::update_owned(
        &state.db,
        claims.sub,
        id,
        payload.title.as_deref(),
        payload.synopsis.as_deref(),
        payload.content.as_deref(),
        payload.image_url.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("Blog"))?;

    info!(blog_id = %blog.id, author_id = %claims.sub, "blog updated");
    Ok(Json(BlogResponse::owned(blog, &claims)))
}

#[instrument(skip(state, claims))]
pub async fn delete_blog(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = repo::soft_delete_owned(&state.db, claims.sub, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Blog"));
    }

    info!(blog_id = %id, author_id = %claims.sub, "blog deleted");
    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".into(),
    }))
}
