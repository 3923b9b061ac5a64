//! Authentication Middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use sb_common::types::Identity;

use crate::api::AppState;

use super::error::AuthError;
use super::jwt::validate_access_token;

/// Middleware to require authentication.
///
/// Extracts the Bearer token from the Authorization header, validates the
/// JWT, and injects the resolved [`Identity`] into request extensions for
/// the authorization layer and handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(token, &state.config.jwt_secret)?;
    let identity = claims.to_identity();
    if identity.user_id.is_none() {
        return Err(AuthError::InvalidSubject);
    }

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extractor for the authenticated identity in handlers.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Self)
            .ok_or(AuthError::MissingAuthHeader)
    }
}
