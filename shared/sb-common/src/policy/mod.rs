//! Access-policy evaluation.
//!
//! Single source of truth for "is this caller allowed". Both the server
//! middleware and the client route guard evaluate through this module; the
//! server substitutes its external permission store for the final
//! capability lookup via [`Screening::PermissionLookup`], the client uses
//! the built-in table directly.

pub mod table;

pub use table::{dominated_roles, dominates, ConsistencyWarning, PermissionTable};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{
    AccessDecision, AccountType, GrantReason, Identity, PermissionCode, RoleCode,
};

/// Break-glass operator allow-list.
///
/// A small, explicit set of role and user identifiers that bypass every
/// authorization check unconditionally and before any other rule, so
/// operational accounts are never locked out by a misconfigured permission
/// table. Configured once at startup; every match must be audit-logged by
/// the enforcement site.
#[derive(Debug, Clone, Default)]
pub struct BreakGlassList {
    role_ids: Vec<Uuid>,
    user_ids: Vec<Uuid>,
}

impl BreakGlassList {
    /// Build from already-parsed identifiers.
    #[must_use]
    pub const fn new(role_ids: Vec<Uuid>, user_ids: Vec<Uuid>) -> Self {
        Self { role_ids, user_ids }
    }

    /// An empty allow-list (the default for deployments without
    /// break-glass operators).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            role_ids: Vec::new(),
            user_ids: Vec::new(),
        }
    }

    /// Parse identifier lists from configuration strings.
    pub fn try_from_ids<S: AsRef<str>>(role_ids: &[S], user_ids: &[S]) -> Result<Self> {
        let parse = |raw: &[S]| -> Result<Vec<Uuid>> {
            raw.iter()
                .map(|s| {
                    let s = s.as_ref().trim();
                    Uuid::parse_str(s).map_err(|_| Error::InvalidBreakGlassId(s.to_string()))
                })
                .collect()
        };
        Ok(Self {
            role_ids: parse(role_ids)?,
            user_ids: parse(user_ids)?,
        })
    }

    /// Whether the identity carries a break-glass marker.
    #[must_use]
    pub fn matches(&self, identity: &Identity) -> bool {
        identity
            .role_id
            .is_some_and(|id| self.role_ids.contains(&id))
            || identity
                .user_id
                .is_some_and(|id| self.user_ids.contains(&id))
    }

    /// Whether no markers are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.role_ids.is_empty() && self.user_ids.is_empty()
    }
}

/// Outcome of the shared screening rules.
///
/// Screening applies every rule that does not require the external
/// permission store. A domain role falls through to a capability lookup
/// the caller resolves against its own permission source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    /// Decided: access granted.
    Granted(GrantReason),
    /// Decided: access denied.
    Denied(AccessDecision),
    /// Undecided: the role's permission set must be consulted.
    PermissionLookup(RoleCode),
}

/// The shared access policy: validated permission table plus break-glass
/// allow-list. Evaluation is pure and idempotent.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    table: PermissionTable,
    break_glass: BreakGlassList,
}

impl AccessPolicy {
    /// Build a policy from a table and allow-list.
    #[must_use]
    pub const fn new(table: PermissionTable, break_glass: BreakGlassList) -> Self {
        Self { table, break_glass }
    }

    /// The built-in table with no break-glass operators.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(PermissionTable::builtin(), BreakGlassList::empty())
    }

    /// The permission table backing capability checks.
    #[must_use]
    pub const fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// The configured break-glass allow-list.
    #[must_use]
    pub const fn break_glass(&self) -> &BreakGlassList {
        &self.break_glass
    }

    /// Apply the store-independent rules of a permission check.
    ///
    /// Rule order is load-bearing:
    /// 1. break-glass markers, before everything else;
    /// 2. no resolvable role at all → unauthenticated;
    /// 3. SUPER → full bypass;
    /// 4. the mobile-admin alias → full bypass regardless of account type;
    /// 5. an `APP_USER` account → forbidden;
    /// 6. console roles below SUPER → allowed only on an `ADMIN_USER`
    ///    account (blanket grant at this layer);
    /// 7. domain roles → undecided, capability lookup required.
    #[must_use]
    pub fn screen(&self, identity: &Identity) -> Screening {
        if self.break_glass.matches(identity) {
            return Screening::Granted(GrantReason::BreakGlass);
        }

        let Some(role) = identity.role else {
            return Screening::Denied(AccessDecision::Unauthenticated);
        };

        match role {
            RoleCode::Super => Screening::Granted(GrantReason::SuperRole),
            RoleCode::AdminApp => Screening::Granted(GrantReason::MobileAdminAlias),
            _ if identity.account_type == Some(AccountType::AppUser) => {
                Screening::Denied(AccessDecision::Forbidden)
            }
            _ if role.is_admin_console() => {
                if identity.account_type == Some(AccountType::AdminUser) {
                    Screening::Granted(GrantReason::AdminConsole)
                } else {
                    Screening::Denied(AccessDecision::Forbidden)
                }
            }
            _ => Screening::PermissionLookup(role),
        }
    }

    /// Full permission check against the built-in table.
    #[must_use]
    pub fn check_permission(
        &self,
        identity: &Identity,
        permission: PermissionCode,
    ) -> AccessDecision {
        match self.screen(identity) {
            Screening::Granted(reason) => AccessDecision::Allow(reason),
            Screening::Denied(decision) => decision,
            Screening::PermissionLookup(role) => {
                if self.table.grants(role, permission) {
                    AccessDecision::Allow(GrantReason::PermissionSet)
                } else {
                    AccessDecision::Forbidden
                }
            }
        }
    }

    /// Role-set check: is the holder's role allowed among `allowed`?
    ///
    /// Break-glass and SUPER shortcuts apply; console roles presented by an
    /// `APP_USER` account are refused; otherwise the role must either be a
    /// member of the allowed set or dominate one of its members.
    #[must_use]
    pub fn check_role_membership(
        &self,
        identity: &Identity,
        allowed: &[RoleCode],
    ) -> AccessDecision {
        if self.break_glass.matches(identity) {
            return AccessDecision::Allow(GrantReason::BreakGlass);
        }

        let Some(role) = identity.role else {
            return AccessDecision::Unauthenticated;
        };

        if role == RoleCode::Super {
            return AccessDecision::Allow(GrantReason::SuperRole);
        }

        if role.is_admin_console() && identity.account_type == Some(AccountType::AppUser) {
            return AccessDecision::Forbidden;
        }

        if allowed.contains(&role) {
            return AccessDecision::Allow(GrantReason::RoleMembership);
        }

        if dominated_roles(role).iter().any(|d| allowed.contains(d)) {
            return AccessDecision::Allow(GrantReason::RoleHierarchy);
        }

        AccessDecision::Forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_with_break_glass() -> (AccessPolicy, Uuid, Uuid) {
        let role_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let policy = AccessPolicy::new(
            PermissionTable::builtin(),
            BreakGlassList::new(vec![role_id], vec![user_id]),
        );
        (policy, role_id, user_id)
    }

    #[test]
    fn test_break_glass_allows_everything_first() {
        let (policy, role_id, _) = policy_with_break_glass();
        // Deliberately hostile identity: app account, no recognized role.
        let identity = Identity {
            user_id: None,
            role_id: Some(role_id),
            role: None,
            account_type: Some(AccountType::AppUser),
        };

        for permission in PermissionCode::all() {
            assert_eq!(
                policy.check_permission(&identity, *permission),
                AccessDecision::Allow(GrantReason::BreakGlass)
            );
        }
        assert_eq!(
            policy.check_role_membership(&identity, &[RoleCode::Admin]),
            AccessDecision::Allow(GrantReason::BreakGlass)
        );
    }

    #[test]
    fn test_break_glass_matches_user_id_marker() {
        let (policy, _, user_id) = policy_with_break_glass();
        let identity = Identity {
            user_id: Some(user_id),
            role_id: None,
            role: Some(RoleCode::Viewer),
            account_type: Some(AccountType::AppUser),
        };
        assert_eq!(
            policy.check_permission(&identity, PermissionCode::PaymentsRefund),
            AccessDecision::Allow(GrantReason::BreakGlass)
        );
    }

    #[test]
    fn test_super_allows_every_permission() {
        let policy = AccessPolicy::builtin();
        for account_type in [AccountType::AdminUser, AccountType::AppUser] {
            let identity = Identity::with_role(RoleCode::Super, account_type);
            for permission in PermissionCode::all() {
                assert_eq!(
                    policy.check_permission(&identity, *permission),
                    AccessDecision::Allow(GrantReason::SuperRole)
                );
            }
        }
    }

    #[test]
    fn test_mobile_admin_alias_allows_regardless_of_account_type() {
        let policy = AccessPolicy::builtin();
        for account_type in [AccountType::AdminUser, AccountType::AppUser] {
            let identity = Identity::with_role(RoleCode::AdminApp, account_type);
            for permission in PermissionCode::all() {
                assert_eq!(
                    policy.check_permission(&identity, *permission),
                    AccessDecision::Allow(GrantReason::MobileAdminAlias)
                );
            }
        }
    }

    #[test]
    fn test_app_user_account_is_locked_out_of_admin_permissions() {
        let policy = AccessPolicy::builtin();
        // Admin role code on an application account: denied everywhere.
        let identity = Identity::with_role(RoleCode::Admin, AccountType::AppUser);
        for permission in PermissionCode::all() {
            assert_eq!(
                policy.check_permission(&identity, *permission),
                AccessDecision::Forbidden
            );
        }
    }

    #[test]
    fn test_app_user_account_denied_even_for_domain_roles() {
        let policy = AccessPolicy::builtin();
        let identity = Identity::with_role(RoleCode::Viewer, AccountType::AppUser);
        assert_eq!(
            policy.check_permission(&identity, PermissionCode::JobsView),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_console_roles_require_admin_account() {
        let policy = AccessPolicy::builtin();
        for role in [
            RoleCode::Admin,
            RoleCode::Finance,
            RoleCode::Support,
            RoleCode::Moderator,
        ] {
            let admin = Identity::with_role(role, AccountType::AdminUser);
            assert_eq!(
                policy.check_permission(&admin, PermissionCode::UsersView),
                AccessDecision::Allow(GrantReason::AdminConsole)
            );

            // No account type resolved: fail closed for console roles.
            let unknown = Identity {
                role: Some(role),
                ..Identity::anonymous()
            };
            assert_eq!(
                policy.check_permission(&unknown, PermissionCode::UsersView),
                AccessDecision::Forbidden
            );
        }
    }

    #[test]
    fn test_domain_roles_use_permission_sets() {
        let policy = AccessPolicy::builtin();

        let viewer = Identity::with_role(RoleCode::Viewer, AccountType::AdminUser);
        assert_eq!(
            policy.check_permission(&viewer, PermissionCode::JobsView),
            AccessDecision::Allow(GrantReason::PermissionSet)
        );
        assert_eq!(
            policy.check_permission(&viewer, PermissionCode::UsersEdit),
            AccessDecision::Forbidden
        );

        // Account type left unresolved still reaches the lookup for
        // domain roles.
        let contractor = Identity {
            role: Some(RoleCode::GeneralContractor),
            ..Identity::anonymous()
        };
        assert_eq!(
            policy.check_permission(&contractor, PermissionCode::BidsCreate),
            AccessDecision::Allow(GrantReason::PermissionSet)
        );
    }

    #[test]
    fn test_missing_role_is_unauthenticated() {
        let policy = AccessPolicy::builtin();
        let identity = Identity::anonymous();
        assert_eq!(
            policy.check_permission(&identity, PermissionCode::JobsView),
            AccessDecision::Unauthenticated
        );
        assert_eq!(
            policy.check_role_membership(&identity, &[RoleCode::Viewer]),
            AccessDecision::Unauthenticated
        );
    }

    #[test]
    fn test_membership_direct() {
        let policy = AccessPolicy::builtin();
        let finance = Identity::with_role(RoleCode::Finance, AccountType::AdminUser);
        assert_eq!(
            policy.check_role_membership(&finance, &[RoleCode::Finance]),
            AccessDecision::Allow(GrantReason::RoleMembership)
        );
    }

    #[test]
    fn test_membership_denied_for_app_user_account() {
        let policy = AccessPolicy::builtin();
        let finance = Identity::with_role(RoleCode::Finance, AccountType::AppUser);
        assert_eq!(
            policy.check_role_membership(&finance, &[RoleCode::Finance]),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_membership_super_shortcut() {
        let policy = AccessPolicy::builtin();
        let super_user = Identity::with_role(RoleCode::Super, AccountType::AppUser);
        assert_eq!(
            policy.check_role_membership(&super_user, &[RoleCode::Support]),
            AccessDecision::Allow(GrantReason::SuperRole)
        );
    }

    #[test]
    fn test_membership_via_hierarchy() {
        let policy = AccessPolicy::builtin();
        let admin = Identity::with_role(RoleCode::Admin, AccountType::AdminUser);
        assert_eq!(
            policy.check_role_membership(&admin, &[RoleCode::Finance]),
            AccessDecision::Allow(GrantReason::RoleHierarchy)
        );
        assert_eq!(
            policy.check_role_membership(&admin, &[RoleCode::AdminApp]),
            AccessDecision::Allow(GrantReason::RoleHierarchy)
        );
    }

    #[test]
    fn test_membership_no_upward_domination() {
        let policy = AccessPolicy::builtin();
        // MODERATOR does not dominate ADMIN, so an ADMIN-only area denies.
        let moderator = Identity::with_role(RoleCode::Moderator, AccountType::AdminUser);
        assert_eq!(
            policy.check_role_membership(&moderator, &[RoleCode::Admin]),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_membership_domain_roles() {
        let policy = AccessPolicy::builtin();
        let pm = Identity::with_role(RoleCode::ProjectManager, AccountType::AppUser);
        assert_eq!(
            policy.check_role_membership(&pm, &[RoleCode::ProjectManager]),
            AccessDecision::Allow(GrantReason::RoleMembership)
        );
        assert_eq!(
            policy.check_role_membership(&pm, &[RoleCode::GeneralContractor]),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let policy = AccessPolicy::builtin();
        let identity = Identity::with_role(RoleCode::Subcontractor, AccountType::AdminUser);
        let first = policy.check_permission(&identity, PermissionCode::BidsCreate);
        for _ in 0..10 {
            assert_eq!(
                policy.check_permission(&identity, PermissionCode::BidsCreate),
                first
            );
        }
    }

    #[test]
    fn test_try_from_ids_rejects_garbage() {
        let result = BreakGlassList::try_from_ids(&["not-a-uuid"], &[]);
        assert!(matches!(result, Err(Error::InvalidBreakGlassId(_))));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let list = BreakGlassList::empty();
        let identity = Identity {
            user_id: Some(Uuid::new_v4()),
            role_id: Some(Uuid::new_v4()),
            role: Some(RoleCode::Super),
            account_type: None,
        };
        assert!(!list.matches(&identity));
        assert!(list.is_empty());
    }
}
