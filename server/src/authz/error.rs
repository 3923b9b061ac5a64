//! Authorization Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use sb_common::protocol::ApiResponse;

/// Authorization errors surfaced to callers.
///
/// Backing-store failures never appear here; they are resolved inside the
/// permission store by the configured failure policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// No resolvable identity or role.
    #[error("{0}")]
    Unauthenticated(String),

    /// Resolvable identity lacks the requirement.
    #[error("{0}")]
    Forbidden(String),
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };
        let body: ApiResponse<()> = ApiResponse::error(self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forbidden_is_403_envelope() {
        let response = AuthzError::Forbidden("Permission denied".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let envelope: ApiResponse<()> = serde_json::from_slice(&bytes).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message, "Permission denied");
    }

    #[tokio::test]
    async fn test_unauthenticated_is_401() {
        let response =
            AuthzError::Unauthenticated("Authentication required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
