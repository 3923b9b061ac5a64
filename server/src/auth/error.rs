//! Authentication Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use sb_common::protocol::ApiResponse;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing Authorization header.
    #[error("Unauthorized - Missing or invalid token")]
    MissingAuthHeader,

    /// Authorization header is not a Bearer token.
    #[error("Unauthorized - Missing or invalid token")]
    InvalidAuthHeader,

    /// Invalid or expired token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token subject is not a valid user identifier.
    #[error("Invalid token - Missing user identifier")]
    InvalidSubject,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse::error(self.to_string());
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
