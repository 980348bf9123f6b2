use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Client-facing error taxonomy. Every handler failure maps onto one of
/// these kinds; the JSON body shape is stable across all of them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid session")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::Duplicate(_) => "duplicate_identifier",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal causes are logged here and never echoed to the client.
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "internal error");
        }

        let status = match &self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // Unique-constraint violations are the write-time duplicate check;
        // the constraint name tells us which identifier collided.
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some("23505") {
                return match db.constraint() {
                    Some("users_email_key") => ApiError::Duplicate("Email"),
                    Some("users_username_key") => ApiError::Duplicate("Username"),
                    _ => ApiError::Duplicate("Identifier"),
                };
            }
        }
        ApiError::Internal(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_per_kind() {
        let cases = [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::Duplicate("Email"), StatusCode::CONFLICT),
            (ApiError::NotFound("Blog"), StatusCode::NOT_FOUND),
            (
                ApiError::Validation("title is required".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn internal_error_message_is_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn duplicate_message_names_the_identifier() {
        assert_eq!(
            ApiError::Duplicate("Username").to_string(),
            "Username already exists"
        );
    }
}
