use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub key: String,
    pub url: String,
}

/// POST /images (multipart, field `file`): store the binary in the object
/// store and hand back the URL reference. The reference is what ends up on
/// a blog post; the binary itself never touches the database.
#[instrument(skip(state, claims, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("failed to read upload".into()))?;
        if data.is_empty() {
            return Err(ApiError::Validation("file is empty".into()));
        }

        let id = Uuid::new_v4();
        let ext = ext_from_mime(&content_type).unwrap_or("bin");
        let key = format!("blogs/{}/{}.{}", claims.sub, id, ext);

        state
            .storage
            .put_object(&key, data, &content_type)
            .await
            .map_err(ApiError::Internal)?;

        let url = state.storage.public_url(&key);
        info!(user_id = %claims.sub, %key, "image uploaded");
        return Ok((StatusCode::CREATED, Json(UploadResponse { key, url })));
    }

    Err(ApiError::Validation("file field is required".into()))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[tokio::test]
    async fn fake_storage_builds_stable_urls() {
        let state = AppState::fake();
        let url = state.storage.public_url("blogs/u/i.jpg");
        assert_eq!(url, "https://fake.local/blogs/u/i.jpg");
    }
}
