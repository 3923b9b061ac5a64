//! Authorization middleware.
//!
//! Wraps protected routes: reads the resolved [`Identity`] from request
//! extensions, evaluates the shared access policy, and short-circuits the
//! pipeline on deny. Denies map to the standard envelope (401/403);
//! backing-store trouble resolves through the configured failure policy
//! and never surfaces as a 5xx.

pub mod error;
pub mod store;

pub use error::AuthzError;
pub use store::{
    CachedPermissionStore, LookupOutcome, PermissionStore, PgPermissionStore, StoreError,
};

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use sb_common::policy::Screening;
use sb_common::types::{
    AccessDecision, AccountType, GrantReason, Identity, PermissionCode, RoleCode,
};

use crate::api::AppState;

/// What a protected route demanded, for deny messages and logging.
#[derive(Debug, Clone, Copy)]
enum Requirement {
    Permission(PermissionCode),
    Roles(&'static [RoleCode]),
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permission(p) => f.write_str(p.code()),
            Self::Roles(roles) => {
                let codes: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                f.write_str(&codes.join("|"))
            }
        }
    }
}

/// Middleware body requiring a capability.
///
/// Use with a closure over `middleware::from_fn_with_state`:
///
/// ```ignore
/// .layer(middleware::from_fn_with_state(
///     state.clone(),
///     |State(s): State<AppState>, req: Request, next: Next| async move {
///         authz::require_permission(s, PermissionCode::UsersView, req, next).await
///     },
/// ))
/// ```
#[tracing::instrument(skip(state, request, next))]
pub async fn require_permission(
    state: AppState,
    permission: PermissionCode,
    request: Request,
    next: Next,
) -> Response {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or_else(Identity::anonymous);

    let decision = match state.policy.screen(&identity) {
        Screening::Granted(reason) => AccessDecision::Allow(reason),
        Screening::Denied(decision) => decision,
        Screening::PermissionLookup(role) => {
            match state.permissions.is_granted(role, permission).await {
                LookupOutcome::Granted => AccessDecision::Allow(GrantReason::PermissionSet),
                LookupOutcome::FailOpen => AccessDecision::Allow(GrantReason::FailOpen),
                LookupOutcome::Denied => AccessDecision::Forbidden,
            }
        }
    };

    finish(
        decision,
        &identity,
        Requirement::Permission(permission),
        request,
        next,
    )
    .await
}

/// Middleware body requiring membership in a role set.
#[tracing::instrument(skip(state, request, next))]
pub async fn require_role_membership(
    state: AppState,
    allowed: &'static [RoleCode],
    request: Request,
    next: Next,
) -> Response {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or_else(Identity::anonymous);

    let decision = state.policy.check_role_membership(&identity, allowed);

    finish(decision, &identity, Requirement::Roles(allowed), request, next).await
}

async fn finish(
    decision: AccessDecision,
    identity: &Identity,
    requirement: Requirement,
    request: Request,
    next: Next,
) -> Response {
    match decision {
        AccessDecision::Allow(reason) => {
            // Allows are silent to limit volume; break-glass bypasses are
            // the exception and always leave an audit trail. Fail-open
            // grants are logged with their cause at the store.
            if reason == GrantReason::BreakGlass {
                tracing::warn!(
                    user_id = ?identity.user_id,
                    role_id = ?identity.role_id,
                    requirement = %requirement,
                    "break-glass bypass granted"
                );
            }
            next.run(request).await
        }
        AccessDecision::Forbidden => {
            tracing::warn!(
                role = ?identity.role,
                account_type = ?identity.account_type,
                requirement = %requirement,
                "authorization denied"
            );
            AuthzError::Forbidden(deny_message(identity, requirement).to_string()).into_response()
        }
        AccessDecision::Unauthenticated => {
            tracing::warn!(requirement = %requirement, "authorization denied: no resolvable role");
            let message = match requirement {
                Requirement::Permission(_) => "Role not found in token",
                Requirement::Roles(_) => "Authentication required",
            };
            AuthzError::Unauthenticated(message.to_string()).into_response()
        }
    }
}

fn deny_message(identity: &Identity, requirement: Requirement) -> &'static str {
    let console_role = identity.role.is_some_and(|r| r.is_admin_console());
    let app_account = identity.account_type == Some(AccountType::AppUser);

    match requirement {
        Requirement::Permission(_) => {
            if app_account {
                "APP users cannot access admin console"
            } else if console_role {
                "Only ADMIN_USER accounts can access admin console"
            } else {
                "Permission denied"
            }
        }
        Requirement::Roles(_) => {
            if console_role && app_account {
                "APP users cannot access admin console"
            } else {
                "Access denied. Insufficient privileges."
            }
        }
    }
}
