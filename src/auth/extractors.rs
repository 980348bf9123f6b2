use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::claims::Claims;
use super::cookie;
use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Session gate: pulls the auth cookie off the request, verifies the token
/// and hands the decoded identity to the handler. Requests without a valid
/// session never reach the handler body.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let token =
            cookie::extract_auth_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;

        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::Unauthenticated
        })?;

        Ok(AuthUser(claims))
    }
}
