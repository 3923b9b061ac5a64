//! Shared Access-Control Types

pub mod decision;
pub mod identity;
pub mod permission;
pub mod role;

pub use decision::{AccessDecision, GrantReason};
pub use identity::Identity;
pub use permission::PermissionCode;
pub use role::{AccountType, RoleCode};
