//! Role and account-type codes.
//!
//! The role set is fixed at build time. Parsing is case-insensitive and
//! fails closed: a code that is not recognized resolves to no role at all,
//! never to a guessed one.

use serde::{Deserialize, Serialize};

/// Canonical identifier for a user's assigned role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCode {
    /// Top-level super administrator. Bypasses every check.
    Super,
    /// Console administrator.
    Admin,
    /// Mobile-app administrator alias. Treated as a console admin for
    /// permission purposes regardless of account type, but refused console
    /// navigation by the client guard.
    AdminApp,
    /// Finance operations.
    Finance,
    /// Support / ticketing.
    Support,
    /// Content and user moderation.
    Moderator,
    /// Project owner running jobs and accepting bids.
    ProjectManager,
    /// General contractor bidding on jobs.
    GeneralContractor,
    /// Subcontractor bidding on jobs.
    Subcontractor,
    /// Trade specialist bidding on jobs.
    TradeSpecialist,
    /// Read-only marketplace access.
    Viewer,
}

impl RoleCode {
    /// Returns the canonical wire code for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Super => "SUPER",
            Self::Admin => "ADMIN",
            Self::AdminApp => "ADMIN_APP",
            Self::Finance => "FINANCE",
            Self::Support => "SUPPORT",
            Self::Moderator => "MODERATOR",
            Self::ProjectManager => "PROJECT_MANAGER",
            Self::GeneralContractor => "GENERAL_CONTRACTOR",
            Self::Subcontractor => "SUBCONTRACTOR",
            Self::TradeSpecialist => "TRADE_SPECIALIST",
            Self::Viewer => "VIEWER",
        }
    }

    /// Parse a wire code, case-insensitively.
    ///
    /// Accepts the legacy aliases still present in older profile rows
    /// (`super_admin`, `FIN`, `finance_manager`, `MOD`, `support_agent`).
    /// Unknown codes yield `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "SUPER" | "SUPER_ADMIN" => Some(Self::Super),
            "ADMIN" => Some(Self::Admin),
            "ADMIN_APP" => Some(Self::AdminApp),
            "FINANCE" | "FIN" | "FINANCE_MANAGER" => Some(Self::Finance),
            "SUPPORT" | "SUPPORT_AGENT" => Some(Self::Support),
            "MODERATOR" | "MOD" => Some(Self::Moderator),
            "PROJECT_MANAGER" => Some(Self::ProjectManager),
            "GENERAL_CONTRACTOR" => Some(Self::GeneralContractor),
            "SUBCONTRACTOR" => Some(Self::Subcontractor),
            "TRADE_SPECIALIST" => Some(Self::TradeSpecialist),
            "VIEWER" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Returns all role codes as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Super,
            Self::Admin,
            Self::AdminApp,
            Self::Finance,
            Self::Support,
            Self::Moderator,
            Self::ProjectManager,
            Self::GeneralContractor,
            Self::Subcontractor,
            Self::TradeSpecialist,
            Self::Viewer,
        ]
    }

    /// Whether this is a recognized admin-console role below SUPER.
    ///
    /// SUPER and ADMIN_APP are handled by their own shortcuts and are
    /// deliberately not part of this set.
    #[must_use]
    pub const fn is_admin_console(&self) -> bool {
        matches!(
            self,
            Self::Admin | Self::Finance | Self::Support | Self::Moderator
        )
    }

    /// Whether this is a marketplace (domain) role whose access is decided
    /// by its permission set rather than a blanket console grant.
    #[must_use]
    pub const fn is_domain_role(&self) -> bool {
        matches!(
            self,
            Self::ProjectManager
                | Self::GeneralContractor
                | Self::Subcontractor
                | Self::TradeSpecialist
                | Self::Viewer
        )
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies whether an identity belongs to the admin console or the
/// end-user application surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Admin-console account.
    AdminUser,
    /// End-user application account.
    AppUser,
}

impl AccountType {
    /// Returns the canonical wire code for this account type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminUser => "ADMIN_USER",
            Self::AppUser => "APP_USER",
        }
    }

    /// Parse a wire code, case-insensitively. Unknown codes yield `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "ADMIN_USER" => Some(Self::AdminUser),
            "APP_USER" => Some(Self::AppUser),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
