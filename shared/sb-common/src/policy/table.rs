//! Role model tables.
//!
//! Two distinct mechanisms live here and are deliberately kept separate:
//! the role → permission-set table consulted for fine-grained capability
//! checks on domain roles, and the role-domination relation consulted for
//! role-set checks. They are not guaranteed to be mutually consistent;
//! `audit_consistency` surfaces the divergence at startup instead of
//! hiding it.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{PermissionCode, PermissionCode as P, RoleCode, RoleCode as R};

/// Typed, explicitly constructed role → permission-set mapping.
///
/// Total and fail-closed: a role without an entry holds the empty set.
/// Built once at startup and treated as immutable afterwards.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    grants: HashMap<RoleCode, Vec<PermissionCode>>,
}

impl PermissionTable {
    /// Build a table from explicit entries, rejecting duplicate roles and
    /// duplicate grants within a role's set.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (RoleCode, Vec<PermissionCode>)>,
    ) -> Result<Self> {
        let mut grants: HashMap<RoleCode, Vec<PermissionCode>> = HashMap::new();
        for (role, permissions) in entries {
            if grants.contains_key(&role) {
                return Err(Error::DuplicateRole(role));
            }
            let mut seen = Vec::with_capacity(permissions.len());
            for permission in &permissions {
                if seen.contains(permission) {
                    return Err(Error::DuplicateGrant {
                        role,
                        permission: *permission,
                    });
                }
                seen.push(*permission);
            }
            grants.insert(role, permissions);
        }
        Ok(Self { grants })
    }

    /// The built-in table shipped with the platform.
    ///
    /// Only roles decided by capability lookup carry entries; SUPER and the
    /// console roles are granted upstream of the table and enumerate
    /// nothing here, except MODERATOR, whose set is retained for parity
    /// with the platform's seeded permission store.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = [
            (
                R::Admin,
                vec![
                    P::UsersView,
                    P::UsersEdit,
                    P::UsersDelete,
                    P::UsersSuspend,
                    P::JobsView,
                    P::JobsEdit,
                    P::JobsDelete,
                    P::JobsFeature,
                    P::BidsView,
                    P::BidsEdit,
                    P::BidsDelete,
                    P::ProjectsView,
                    P::ProjectsEdit,
                    P::ProjectsDelete,
                    P::PaymentsView,
                    P::PaymentsRefund,
                    P::PaymentsRelease,
                    P::ReviewsView,
                    P::ReviewsDelete,
                    P::ReviewsModerate,
                    P::DisputesView,
                    P::DisputesResolve,
                    P::VerificationApprove,
                    P::VerificationReject,
                    P::AnalyticsView,
                    P::SystemSettings,
                    P::SystemLogs,
                ],
            ),
            (
                R::Moderator,
                vec![
                    P::UsersView,
                    P::UsersSuspend,
                    P::JobsView,
                    P::JobsModerate,
                    P::ReviewsView,
                    P::ReviewsModerate,
                    P::ContentModerate,
                ],
            ),
            (
                R::ProjectManager,
                vec![
                    P::JobsCreate,
                    P::JobsView,
                    P::JobsEdit,
                    P::JobsDelete,
                    P::BidsView,
                    P::BidsAccept,
                    P::BidsReject,
                    P::ProjectsView,
                    P::ProjectsManage,
                    P::ContractorsView,
                    P::ContractorsInvite,
                    P::MessagesSend,
                    P::MessagesView,
                    P::PaymentsDeposit,
                    P::PaymentsRelease,
                    P::ProfileEdit,
                ],
            ),
            (
                R::GeneralContractor,
                vec![
                    P::JobsView,
                    P::JobsApply,
                    P::BidsCreate,
                    P::BidsView,
                    P::BidsEdit,
                    P::ProjectsView,
                    P::ProjectsUpdate,
                    P::MessagesSend,
                    P::MessagesView,
                    P::ProfileEdit,
                ],
            ),
            (
                R::Subcontractor,
                vec![
                    P::JobsView,
                    P::JobsApply,
                    P::BidsCreate,
                    P::BidsView,
                    P::ProjectsView,
                    P::MessagesSend,
                    P::MessagesView,
                    P::ProfileEdit,
                ],
            ),
            (
                R::TradeSpecialist,
                vec![
                    P::JobsView,
                    P::JobsApply,
                    P::BidsCreate,
                    P::BidsView,
                    P::ProjectsView,
                    P::MessagesSend,
                    P::MessagesView,
                    P::ProfileEdit,
                ],
            ),
            (
                R::Viewer,
                vec![P::JobsView, P::ContractorsView, P::ProjectsView],
            ),
        ];

        Self::from_entries(entries).expect("builtin permission table is well formed")
    }

    /// The enumerated permission set for a role. Roles without an entry
    /// yield the empty set.
    #[must_use]
    pub fn permissions_for(&self, role: RoleCode) -> &[PermissionCode] {
        self.grants.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Whether the role's enumerated set contains the permission.
    #[must_use]
    pub fn grants(&self, role: RoleCode, permission: PermissionCode) -> bool {
        self.permissions_for(role).contains(&permission)
    }

    /// Audit the permission table against the domination relation.
    ///
    /// Reports every pair where a role dominates another for role-set
    /// checks but its enumerated permission set is not a superset of the
    /// dominated role's. Dominators with no enumerated set are granted
    /// upstream of the table and are skipped; there is nothing to compare.
    #[must_use]
    pub fn audit_consistency(&self) -> Vec<ConsistencyWarning> {
        let mut warnings = Vec::new();
        for role in RoleCode::all() {
            let own = self.permissions_for(*role);
            if own.is_empty() {
                continue;
            }
            for dominated in dominated_roles(*role) {
                if dominated == role {
                    continue;
                }
                let missing: Vec<PermissionCode> = self
                    .permissions_for(*dominated)
                    .iter()
                    .copied()
                    .filter(|p| !own.contains(p))
                    .collect();
                if !missing.is_empty() {
                    warnings.push(ConsistencyWarning {
                        dominator: *role,
                        dominated: *dominated,
                        missing,
                    });
                }
            }
        }
        warnings
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A domination pair whose permission sets are not nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyWarning {
    /// The superior role.
    pub dominator: RoleCode,
    /// The dominated role.
    pub dominated: RoleCode,
    /// Permissions the dominated role holds that the dominator does not.
    pub missing: Vec<PermissionCode>,
}

impl std::fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} dominates {} but lacks {} of its permissions",
            self.dominator,
            self.dominated,
            self.missing.len()
        )
    }
}

/// The roles a given role's holder is also authorized to act as,
/// including itself.
///
/// SUPER and ADMIN dominate the console roles (ADMIN additionally passes
/// checks that admit the mobile alias); every other role dominates only
/// itself. This relation governs role-set checks, not capability checks.
#[must_use]
pub const fn dominated_roles(role: RoleCode) -> &'static [RoleCode] {
    match role {
        R::Super => &[
            R::Super,
            R::Admin,
            R::AdminApp,
            R::Finance,
            R::Support,
            R::Moderator,
        ],
        R::Admin => &[R::Admin, R::AdminApp, R::Finance, R::Support, R::Moderator],
        R::AdminApp => &[R::AdminApp],
        R::Finance => &[R::Finance],
        R::Support => &[R::Support],
        R::Moderator => &[R::Moderator],
        R::ProjectManager => &[R::ProjectManager],
        R::GeneralContractor => &[R::GeneralContractor],
        R::Subcontractor => &[R::Subcontractor],
        R::TradeSpecialist => &[R::TradeSpecialist],
        R::Viewer => &[R::Viewer],
    }
}

/// Whether `role` dominates `target` (reflexively).
#[must_use]
pub fn dominates(role: RoleCode, target: RoleCode) -> bool {
    dominated_roles(role).contains(&target)
}
