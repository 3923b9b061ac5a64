//! Access-token validation.
//!
//! Tokens are issued by the external identity service and verified here
//! with the shared HS256 secret. Older tokens may predate the role claim;
//! the profile-derived fields are therefore optional and anything
//! unrecognized parses to no role at all.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sb_common::types::{AccountType, Identity, RoleCode};

use super::error::{AuthError, AuthResult};

/// JWT claims for marketplace access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Role code as stored on the profile (e.g. "FINANCE").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_code: Option<String>,
    /// Account surface ("ADMIN_USER" or "APP_USER").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    /// Stable role-row identifier, used for break-glass lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<Uuid>,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Resolve the claims into the identity record the authorization
    /// layer evaluates. Unknown role or account codes fail closed.
    #[must_use]
    pub fn to_identity(&self) -> Identity {
        Identity {
            user_id: Uuid::parse_str(&self.sub).ok(),
            role_id: self.role_id,
            role: self.role_code.as_deref().and_then(RoleCode::parse),
            account_type: self.account_type.as_deref().and_then(AccountType::parse),
        }
    }
}

/// Validate an access token and return its claims.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
