//! Route guard.
//!
//! Gates client-side navigation to console screens with the same shared
//! policy the server enforces. Evaluation is synchronous, pure, and
//! side-effect-free; the caller performs the navigation a state asks for.
//! Re-evaluate on every session snapshot or route change — superseded
//! evaluations are simply replaced by the next one.

use sb_common::policy::AccessPolicy;
use sb_common::types::RoleCode;

use crate::session::SessionSnapshot;

/// Console roles admitted when a screen requires the admin console.
const CONSOLE_ROLES: &[RoleCode] = &[
    RoleCode::Admin,
    RoleCode::Finance,
    RoleCode::Support,
    RoleCode::Moderator,
];

/// What a protected screen declares about itself.
#[derive(Debug, Clone, Default)]
pub struct RouteRequirement {
    /// Roles allowed on this screen, checked through the shared
    /// membership/hierarchy rules.
    pub allowed_roles: Option<Vec<RoleCode>>,
    /// Whether the screen belongs to the admin console at all.
    pub require_admin_console: bool,
}

impl RouteRequirement {
    /// A screen with no restrictions beyond being signed in.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            allowed_roles: None,
            require_admin_console: false,
        }
    }

    /// A console screen open to any console role.
    #[must_use]
    pub const fn admin_console() -> Self {
        Self {
            allowed_roles: None,
            require_admin_console: true,
        }
    }

    /// A screen restricted to the given roles.
    #[must_use]
    pub const fn roles(allowed: Vec<RoleCode>) -> Self {
        Self {
            allowed_roles: Some(allowed),
            require_admin_console: false,
        }
    }
}

/// Where a denied navigation should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// The sign-in entry point.
    SignIn,
    /// The dedicated forbidden page with role-specific guidance.
    Forbidden,
    /// The default authenticated landing page. Legitimate users hitting
    /// the wrong section get somewhere useful, not a dead-end.
    DefaultLanding,
}

/// Guard evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Identity not yet resolved; render a neutral loading state and do
    /// not redirect.
    Loading,
    /// No identity; go to sign-in.
    Unauthenticated,
    /// Identity present but the role has not arrived yet; hold rather
    /// than deny.
    Evaluating,
    /// Render the guarded content.
    Allowed,
    /// Redirect away.
    Denied(NavTarget),
}

impl GuardState {
    /// The navigation this state asks for, if any.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<NavTarget> {
        match self {
            Self::Unauthenticated => Some(NavTarget::SignIn),
            Self::Denied(target) => Some(*target),
            Self::Loading | Self::Evaluating | Self::Allowed => None,
        }
    }
}

/// Evaluate a navigation against the session and the screen's declaration.
#[must_use]
pub fn evaluate_route(
    policy: &AccessPolicy,
    snapshot: &SessionSnapshot,
    requirement: &RouteRequirement,
) -> GuardState {
    // Never redirect while the session is still resolving.
    if snapshot.loading {
        return GuardState::Loading;
    }

    let Some(user) = &snapshot.user else {
        return GuardState::Unauthenticated;
    };

    let identity = user.identity();

    if policy.break_glass().matches(&identity) {
        return GuardState::Allowed;
    }

    // Role may arrive asynchronously after the base profile; hold until
    // it does instead of denying.
    let Some(raw_role) = user.role_code.as_deref().map(str::trim).filter(|r| !r.is_empty())
    else {
        return GuardState::Evaluating;
    };

    // A populated but unrecognized role code fails closed.
    let Some(role) = RoleCode::parse(raw_role) else {
        return GuardState::Denied(NavTarget::DefaultLanding);
    };

    if role == RoleCode::Super {
        return GuardState::Allowed;
    }

    // The mobile-admin alias never gets console screens; it lands on a
    // dedicated forbidden page that explains where to go instead.
    if role == RoleCode::AdminApp {
        return GuardState::Denied(NavTarget::Forbidden);
    }

    if requirement.require_admin_console
        && !policy
            .check_role_membership(&identity, CONSOLE_ROLES)
            .is_allowed()
    {
        return GuardState::Denied(NavTarget::DefaultLanding);
    }

    if let Some(allowed) = &requirement.allowed_roles {
        if !policy.check_role_membership(&identity, allowed).is_allowed() {
            return GuardState::Denied(NavTarget::DefaultLanding);
        }
    }

    GuardState::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use sb_common::policy::{BreakGlassList, PermissionTable};
    use sb_common::types::AccountType;
    use uuid::Uuid;

    fn policy() -> AccessPolicy {
        AccessPolicy::builtin()
    }

    fn snapshot_with(role_code: Option<&str>, account_type: Option<AccountType>) -> SessionSnapshot {
        SessionSnapshot {
            loading: false,
            user: Some(SessionUser {
                id: Uuid::new_v4(),
                role_id: None,
                role_code: role_code.map(String::from),
                account_type,
            }),
        }
    }

    #[test]
    fn test_never_redirects_while_loading() {
        let policy = policy();
        for role_code in [None, Some("SUPER"), Some("ADMIN_APP"), Some("WIZARD")] {
            let snapshot = SessionSnapshot {
                loading: true,
                user: role_code.map(|code| SessionUser {
                    id: Uuid::new_v4(),
                    role_id: None,
                    role_code: Some(code.to_string()),
                    account_type: None,
                }),
            };
            let state = evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console());
            assert_eq!(state, GuardState::Loading);
            assert_eq!(state.redirect_target(), None);
        }
    }

    #[test]
    fn test_no_user_redirects_to_sign_in() {
        let state = evaluate_route(
            &policy(),
            &SessionSnapshot::signed_out(),
            &RouteRequirement::open(),
        );
        assert_eq!(state, GuardState::Unauthenticated);
        assert_eq!(state.redirect_target(), Some(NavTarget::SignIn));
    }

    #[test]
    fn test_holds_while_role_is_unpopulated() {
        let policy = policy();
        for role_code in [None, Some(""), Some("  ")] {
            let snapshot = snapshot_with(role_code, Some(AccountType::AdminUser));
            let state = evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console());
            assert_eq!(state, GuardState::Evaluating);
            assert_eq!(state.redirect_target(), None);
        }
    }

    #[test]
    fn test_super_is_always_allowed() {
        let policy = policy();
        let snapshot = snapshot_with(Some("SUPER"), Some(AccountType::AppUser));

        for requirement in [
            RouteRequirement::open(),
            RouteRequirement::admin_console(),
            RouteRequirement::roles(vec![RoleCode::Finance]),
        ] {
            assert_eq!(
                evaluate_route(&policy, &snapshot, &requirement),
                GuardState::Allowed
            );
        }
    }

    #[test]
    fn test_break_glass_marker_is_always_allowed() {
        let user_id = Uuid::new_v4();
        let policy = AccessPolicy::new(
            PermissionTable::builtin(),
            BreakGlassList::new(Vec::new(), vec![user_id]),
        );
        let snapshot = SessionSnapshot {
            loading: false,
            user: Some(SessionUser {
                id: user_id,
                role_id: None,
                role_code: None,
                account_type: None,
            }),
        };

        assert_eq!(
            evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console()),
            GuardState::Allowed
        );
    }

    #[test]
    fn test_mobile_admin_gets_forbidden_page() {
        let policy = policy();
        let snapshot = snapshot_with(Some("ADMIN_APP"), Some(AccountType::AppUser));

        let state = evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console());
        assert_eq!(state, GuardState::Denied(NavTarget::Forbidden));
        assert_eq!(state.redirect_target(), Some(NavTarget::Forbidden));
    }

    #[test]
    fn test_console_role_enters_console() {
        let policy = policy();
        for role_code in ["ADMIN", "FINANCE", "SUPPORT", "MODERATOR"] {
            let snapshot = snapshot_with(Some(role_code), Some(AccountType::AdminUser));
            assert_eq!(
                evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console()),
                GuardState::Allowed,
                "{role_code} should enter the console"
            );
        }
    }

    #[test]
    fn test_domain_role_lands_on_default_page_not_error() {
        let policy = policy();
        let snapshot = snapshot_with(Some("GENERAL_CONTRACTOR"), Some(AccountType::AppUser));

        let state = evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console());
        assert_eq!(state, GuardState::Denied(NavTarget::DefaultLanding));
    }

    #[test]
    fn test_moderator_denied_from_admin_only_screen() {
        let policy = policy();
        let snapshot = snapshot_with(Some("MODERATOR"), Some(AccountType::AdminUser));

        // No MODERATOR -> ADMIN domination: default landing, not forbidden.
        let state = evaluate_route(
            &policy,
            &snapshot,
            &RouteRequirement::roles(vec![RoleCode::Admin]),
        );
        assert_eq!(state, GuardState::Denied(NavTarget::DefaultLanding));
    }

    #[test]
    fn test_admin_enters_finance_screen_via_hierarchy() {
        let policy = policy();
        let snapshot = snapshot_with(Some("ADMIN"), Some(AccountType::AdminUser));

        assert_eq!(
            evaluate_route(
                &policy,
                &snapshot,
                &RouteRequirement::roles(vec![RoleCode::Finance]),
            ),
            GuardState::Allowed
        );
    }

    #[test]
    fn test_app_account_with_console_role_is_denied() {
        let policy = policy();
        let snapshot = snapshot_with(Some("FINANCE"), Some(AccountType::AppUser));

        let state = evaluate_route(
            &policy,
            &snapshot,
            &RouteRequirement::roles(vec![RoleCode::Finance]),
        );
        assert_eq!(state, GuardState::Denied(NavTarget::DefaultLanding));
    }

    #[test]
    fn test_unknown_role_code_fails_closed() {
        let policy = policy();
        let snapshot = snapshot_with(Some("WIZARD"), Some(AccountType::AdminUser));

        let state = evaluate_route(&policy, &snapshot, &RouteRequirement::admin_console());
        assert_eq!(state, GuardState::Denied(NavTarget::DefaultLanding));
    }

    #[test]
    fn test_open_route_allows_any_signed_in_role() {
        let policy = policy();
        let snapshot = snapshot_with(Some("VIEWER"), Some(AccountType::AppUser));

        assert_eq!(
            evaluate_route(&policy, &snapshot, &RouteRequirement::open()),
            GuardState::Allowed
        );
    }

    #[test]
    fn test_reevaluation_follows_snapshot_changes() {
        let policy = policy();
        let requirement = RouteRequirement::admin_console();

        // Role arrives after the base profile: Evaluating -> Allowed.
        let before = snapshot_with(None, Some(AccountType::AdminUser));
        assert_eq!(
            evaluate_route(&policy, &before, &requirement),
            GuardState::Evaluating
        );

        let after = snapshot_with(Some("SUPPORT"), Some(AccountType::AdminUser));
        assert_eq!(
            evaluate_route(&policy, &after, &requirement),
            GuardState::Allowed
        );

        // Identical inputs, identical outcome.
        assert_eq!(
            evaluate_route(&policy, &after, &requirement),
            evaluate_route(&policy, &after, &requirement)
        );
    }
}
