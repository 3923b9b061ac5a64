//! Resolved request identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{AccountType, RoleCode};

/// An already-authenticated identity as both enforcement points see it.
///
/// Produced by the server's token-validation middleware or the client's
/// session store; this crate never resolves tokens itself. Every field is
/// optional: a token may predate the role claim, and a profile row may
/// carry a role code this build does not recognize (which parses to no
/// role and fails closed downstream).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user identifier, used for break-glass lookups.
    pub user_id: Option<Uuid>,
    /// Stable role-row identifier, used for break-glass lookups.
    pub role_id: Option<Uuid>,
    /// Parsed role code, if the presented code was recognized.
    pub role: Option<RoleCode>,
    /// Account surface classification.
    pub account_type: Option<AccountType>,
}

impl Identity {
    /// An identity with no resolvable role. Evaluates as unauthenticated.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            role_id: None,
            role: None,
            account_type: None,
        }
    }

    /// Convenience constructor for a role + account-type pair.
    #[must_use]
    pub const fn with_role(role: RoleCode, account_type: AccountType) -> Self {
        Self {
            user_id: None,
            role_id: None,
            role: Some(role),
            account_type: Some(account_type),
        }
    }
}
