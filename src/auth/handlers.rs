use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie,
        dto::{
            LoginRequest, MessageResponse, ProfileResponse, PublicUser, RegisterRequest,
            UpdatePasswordRequest, UpdateProfileRequest,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{check_strength, hash_password, verify_password},
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/password", put(update_password))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    payload.first_name = payload.first_name.trim().to_string();
    payload.last_name = payload.last_name.trim().to_string();
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    for (field, value) in [
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
        ("username", &payload.username),
        ("email", &payload.email),
    ] {
        if value.is_empty() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    check_strength(&state.config.password, &payload.password).map_err(ApiError::Validation)?;

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    let user = User::create(
        &state.db,
        &payload.first_name,
        &payload.last_name,
        &payload.username,
        &payload.email,
        &hash,
    )
    .await?;

    // No session is granted here; the client logs in separately.
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<PublicUser>), ApiError> {
    let identifier = payload.identifier.trim();

    // Unknown identifier and wrong password both collapse into the same
    // outcome so callers cannot probe which accounts exist.
    let Some(user) = User::find_by_identifier(&state.db, identifier).await? else {
        warn!("login with unknown identifier");
        return Err(ApiError::InvalidCredentials);
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user).map_err(ApiError::Internal)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie::session_cookie(&token, keys.ttl.as_secs(), state.config.cookie_secure)
            .map_err(|e| ApiError::Internal(e.into()))?,
    );

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((headers, Json(PublicUser::from(&user))))
}

/// Stateless tokens mean logout is purely a client instruction: clear the
/// cookie and report success, whether or not a session was presented.
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie::clear_session_cookie(state.config.cookie_secure)
            .map_err(|e| ApiError::Internal(e.into()))?,
    );
    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    ))
}

#[instrument(skip(state, claims))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, claims, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(mut payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    for (field, value) in [
        ("first_name", &mut payload.first_name),
        ("last_name", &mut payload.last_name),
        ("username", &mut payload.username),
    ] {
        if let Some(v) = value {
            *v = v.trim().to_string();
            if v.is_empty() {
                return Err(ApiError::Validation(format!("{field} cannot be blank")));
            }
        }
    }
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    let user = User::update_profile(
        &state.db,
        claims.sub,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
        payload.username.as_deref(),
        payload.email.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, claims, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let ok = verify_password(&payload.current_password, &user.password_hash)
        .map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "password change with wrong current password");
        return Err(ApiError::InvalidCredentials);
    }

    check_strength(&state.config.password, &payload.new_password).map_err(ApiError::Validation)?;

    let hash = hash_password(&payload.new_password).map_err(ApiError::Internal)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password updated");
    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@x.com"));
    }
}
