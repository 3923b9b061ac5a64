//! Capability codes checked against a role's granted set.
//!
//! The set is fully enumerated at build time; there is no wildcard or
//! pattern matching. Each code has a stable dotted wire form used by the
//! external permission store and by middleware declarations.

use serde::{Deserialize, Serialize};

/// A discrete capability that can be granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionCode {
    // === User management ===
    #[serde(rename = "users.view")]
    UsersView,
    #[serde(rename = "users.edit")]
    UsersEdit,
    #[serde(rename = "users.delete")]
    UsersDelete,
    #[serde(rename = "users.suspend")]
    UsersSuspend,

    // === Jobs ===
    #[serde(rename = "jobs.view")]
    JobsView,
    #[serde(rename = "jobs.create")]
    JobsCreate,
    #[serde(rename = "jobs.edit")]
    JobsEdit,
    #[serde(rename = "jobs.delete")]
    JobsDelete,
    #[serde(rename = "jobs.feature")]
    JobsFeature,
    #[serde(rename = "jobs.moderate")]
    JobsModerate,
    #[serde(rename = "jobs.apply")]
    JobsApply,

    // === Bids ===
    #[serde(rename = "bids.view")]
    BidsView,
    #[serde(rename = "bids.create")]
    BidsCreate,
    #[serde(rename = "bids.edit")]
    BidsEdit,
    #[serde(rename = "bids.delete")]
    BidsDelete,
    #[serde(rename = "bids.accept")]
    BidsAccept,
    #[serde(rename = "bids.reject")]
    BidsReject,

    // === Projects ===
    #[serde(rename = "projects.view")]
    ProjectsView,
    #[serde(rename = "projects.edit")]
    ProjectsEdit,
    #[serde(rename = "projects.delete")]
    ProjectsDelete,
    #[serde(rename = "projects.update")]
    ProjectsUpdate,
    #[serde(rename = "projects.manage")]
    ProjectsManage,

    // === Payments ===
    #[serde(rename = "payments.view")]
    PaymentsView,
    #[serde(rename = "payments.refund")]
    PaymentsRefund,
    #[serde(rename = "payments.release")]
    PaymentsRelease,
    #[serde(rename = "payments.deposit")]
    PaymentsDeposit,

    // === Reviews ===
    #[serde(rename = "reviews.view")]
    ReviewsView,
    #[serde(rename = "reviews.delete")]
    ReviewsDelete,
    #[serde(rename = "reviews.moderate")]
    ReviewsModerate,

    // === Disputes ===
    #[serde(rename = "disputes.view")]
    DisputesView,
    #[serde(rename = "disputes.resolve")]
    DisputesResolve,

    // === Verification ===
    #[serde(rename = "verification.approve")]
    VerificationApprove,
    #[serde(rename = "verification.reject")]
    VerificationReject,

    // === Analytics ===
    #[serde(rename = "analytics.view")]
    AnalyticsView,

    // === System ===
    #[serde(rename = "system.settings")]
    SystemSettings,
    #[serde(rename = "system.logs")]
    SystemLogs,

    // === Content moderation ===
    #[serde(rename = "content.moderate")]
    ContentModerate,

    // === Messaging ===
    #[serde(rename = "messages.send")]
    MessagesSend,
    #[serde(rename = "messages.view")]
    MessagesView,

    // === Profiles ===
    #[serde(rename = "profile.edit")]
    ProfileEdit,

    // === Contractors ===
    #[serde(rename = "contractors.view")]
    ContractorsView,
    #[serde(rename = "contractors.invite")]
    ContractorsInvite,
}

impl PermissionCode {
    /// Returns the dotted wire code for this permission.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UsersView => "users.view",
            Self::UsersEdit => "users.edit",
            Self::UsersDelete => "users.delete",
            Self::UsersSuspend => "users.suspend",
            Self::JobsView => "jobs.view",
            Self::JobsCreate => "jobs.create",
            Self::JobsEdit => "jobs.edit",
            Self::JobsDelete => "jobs.delete",
            Self::JobsFeature => "jobs.feature",
            Self::JobsModerate => "jobs.moderate",
            Self::JobsApply => "jobs.apply",
            Self::BidsView => "bids.view",
            Self::BidsCreate => "bids.create",
            Self::BidsEdit => "bids.edit",
            Self::BidsDelete => "bids.delete",
            Self::BidsAccept => "bids.accept",
            Self::BidsReject => "bids.reject",
            Self::ProjectsView => "projects.view",
            Self::ProjectsEdit => "projects.edit",
            Self::ProjectsDelete => "projects.delete",
            Self::ProjectsUpdate => "projects.update",
            Self::ProjectsManage => "projects.manage",
            Self::PaymentsView => "payments.view",
            Self::PaymentsRefund => "payments.refund",
            Self::PaymentsRelease => "payments.release",
            Self::PaymentsDeposit => "payments.deposit",
            Self::ReviewsView => "reviews.view",
            Self::ReviewsDelete => "reviews.delete",
            Self::ReviewsModerate => "reviews.moderate",
            Self::DisputesView => "disputes.view",
            Self::DisputesResolve => "disputes.resolve",
            Self::VerificationApprove => "verification.approve",
            Self::VerificationReject => "verification.reject",
            Self::AnalyticsView => "analytics.view",
            Self::SystemSettings => "system.settings",
            Self::SystemLogs => "system.logs",
            Self::ContentModerate => "content.moderate",
            Self::MessagesSend => "messages.send",
            Self::MessagesView => "messages.view",
            Self::ProfileEdit => "profile.edit",
            Self::ContractorsView => "contractors.view",
            Self::ContractorsInvite => "contractors.invite",
        }
    }

    /// Parse a dotted wire code. Unknown codes yield `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|p| p.code() == normalized)
    }

    /// Returns all permission codes as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UsersView,
            Self::UsersEdit,
            Self::UsersDelete,
            Self::UsersSuspend,
            Self::JobsView,
            Self::JobsCreate,
            Self::JobsEdit,
            Self::JobsDelete,
            Self::JobsFeature,
            Self::JobsModerate,
            Self::JobsApply,
            Self::BidsView,
            Self::BidsCreate,
            Self::BidsEdit,
            Self::BidsDelete,
            Self::BidsAccept,
            Self::BidsReject,
            Self::ProjectsView,
            Self::ProjectsEdit,
            Self::ProjectsDelete,
            Self::ProjectsUpdate,
            Self::ProjectsManage,
            Self::PaymentsView,
            Self::PaymentsRefund,
            Self::PaymentsRelease,
            Self::PaymentsDeposit,
            Self::ReviewsView,
            Self::ReviewsDelete,
            Self::ReviewsModerate,
            Self::DisputesView,
            Self::DisputesResolve,
            Self::VerificationApprove,
            Self::VerificationReject,
            Self::AnalyticsView,
            Self::SystemSettings,
            Self::SystemLogs,
            Self::ContentModerate,
            Self::MessagesSend,
            Self::MessagesView,
            Self::ProfileEdit,
            Self::ContractorsView,
            Self::ContractorsInvite,
        ]
    }
}

impl std::fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
