use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::store::StoreError;

/// Body returned by every endpoint on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Error type shared by services and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication required")]
    TokenMissing,
    #[error("invalid or expired token")]
    TokenInvalid,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("not permitted")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("join request already exists")]
    DuplicateRequest,
    #[error("team is full")]
    TeamFull,
    #[error("{0}")]
    Conflict(String),
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::TokenMissing => (StatusCode::UNAUTHORIZED, "TOKEN_MISSING"),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, "TOKEN_INVALID"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
            AppError::DuplicateRequest => (StatusCode::CONFLICT, "DUPLICATE_REQUEST"),
            AppError::TeamFull => (StatusCode::CONFLICT, "TEAM_FULL"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        let message = match self {
            AppError::Storage(e) => {
                error!(error = ?e, "storage failure");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, ErrorBody { code, message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => {
                warn!(%constraint, "unmapped unique violation");
                AppError::Conflict("a conflicting record already exists".into())
            }
            StoreError::Backend(e) => AppError::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_do_not_leak_details() {
        let err = AppError::Storage(anyhow::anyhow!("connection refused on 10.0.0.3"));
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "STORAGE_ERROR");
        assert!(!body.message.contains("10.0.0.3"));
    }

    #[test]
    fn domain_errors_map_to_stable_statuses() {
        let cases = [
            (AppError::validation("bad"), StatusCode::BAD_REQUEST),
            (AppError::TokenMissing, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::NotFound("team"), StatusCode::NOT_FOUND),
            (AppError::DuplicateRequest, StatusCode::CONFLICT),
            (AppError::DuplicateEmail, StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_body().0, expected);
        }
    }

    #[test]
    fn unique_violation_hides_constraint_name() {
        let err: AppError = StoreError::UniqueViolation {
            constraint: "join_requests_team_user_key".into(),
        }
        .into();
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "CONFLICT");
        assert!(!body.message.contains("join_requests"));
    }

    #[test]
    fn not_found_names_the_entity() {
        let (_, body) = AppError::NotFound("hackathon").status_and_body();
        assert_eq!(body.message, "hackathon not found");
    }
}
