//! Common error types.

use crate::types::{PermissionCode, RoleCode};

/// Errors raised while constructing shared policy objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A role appears more than once in a permission table.
    #[error("duplicate permission-table entry for role {0}")]
    DuplicateRole(RoleCode),

    /// A permission appears more than once in a role's set.
    #[error("duplicate grant {permission} for role {role}")]
    DuplicateGrant {
        role: RoleCode,
        permission: PermissionCode,
    },

    /// A break-glass marker could not be parsed as a UUID.
    #[error("invalid break-glass identifier: {0}")]
    InvalidBreakGlassId(String),
}

/// Result type for shared policy operations.
pub type Result<T> = std::result::Result<T, Error>;
