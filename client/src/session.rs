//! Reactive session state.
//!
//! Identity resolution is asynchronous: the profile fetch runs on its own
//! and publishes snapshots through a watch channel; the route guard
//! observes the latest snapshot and never blocks on I/O. Only an explicit
//! unauthenticated signal from the server clears the session; transient
//! fetch failures keep the last-known identity so a flaky network does
//! not log anyone out.

use serde::Deserialize;
use tokio::sync::watch;
use url::Url;
use uuid::Uuid;

use sb_common::protocol::ApiResponse;
use sb_common::types::{AccountType, Identity, RoleCode};

/// The signed-in user as the console knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// User ID.
    pub id: Uuid,
    /// Stable role-row identifier, when the profile carries one.
    pub role_id: Option<Uuid>,
    /// Role code exactly as the profile returned it. `None` while the
    /// role has not arrived yet (it may land after the base profile).
    pub role_code: Option<String>,
    /// Account surface classification.
    pub account_type: Option<AccountType>,
}

impl SessionUser {
    /// Parsed role code; unknown codes resolve to no role (fail closed).
    #[must_use]
    pub fn role(&self) -> Option<RoleCode> {
        self.role_code.as_deref().and_then(RoleCode::parse)
    }

    /// The identity record the shared policy evaluates.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: Some(self.id),
            role_id: self.role_id,
            role: self.role(),
            account_type: self.account_type,
        }
    }
}

/// Point-in-time view of the session, observed by the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Whether a profile fetch is in flight with nothing resolved yet.
    pub loading: bool,
    /// The signed-in user, if any.
    pub user: Option<SessionUser>,
}

impl SessionSnapshot {
    /// Initial state: fetch in flight, nothing known.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    /// Signed-out state.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            loading: false,
            user: None,
        }
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}

/// Why a profile fetch produced no user.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The server said the session is gone (HTTP 401). This is the only
    /// signal that clears local session state.
    #[error("session is no longer authenticated")]
    Unauthenticated,

    /// Anything else: network trouble, server errors, bad payloads.
    /// The last-known identity is retained.
    #[error("profile fetch failed: {0}")]
    Transport(String),
}

/// Pure transition applied to the current snapshot when a fetch resolves.
#[must_use]
pub fn apply_profile_result(
    current: &SessionSnapshot,
    result: Result<SessionUser, FetchError>,
) -> SessionSnapshot {
    match result {
        Ok(user) => SessionSnapshot {
            loading: false,
            user: Some(user),
        },
        Err(FetchError::Unauthenticated) => SessionSnapshot::signed_out(),
        Err(FetchError::Transport(cause)) => {
            tracing::warn!(cause = %cause, "profile fetch failed, keeping last-known identity");
            SessionSnapshot {
                loading: false,
                user: current.user.clone(),
            }
        }
    }
}

/// Profile payload from the server's `/api/v1/auth/me`.
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user_id: Option<Uuid>,
    role_id: Option<Uuid>,
    role: Option<String>,
    account_type: Option<String>,
}

impl ProfileResponse {
    fn into_user(self) -> Result<SessionUser, FetchError> {
        let id = self
            .user_id
            .ok_or_else(|| FetchError::Transport("profile missing user id".to_string()))?;
        Ok(SessionUser {
            id,
            role_id: self.role_id,
            role_code: self.role,
            account_type: self.account_type.as_deref().and_then(AccountType::parse),
        })
    }
}

/// Owns the session snapshot and its watch channel.
pub struct SessionManager {
    http: reqwest::Client,
    base_url: Url,
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionManager {
    /// Create a manager pointed at the API server.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::loading());
        Self {
            http: reqwest::Client::new(),
            base_url,
            tx,
        }
    }

    /// Subscribe to session snapshots. The guard re-evaluates on every
    /// change notification.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// The latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Fetch the profile and publish the resulting snapshot.
    pub async fn refresh(&self, access_token: &str) {
        let result = self.fetch_profile(access_token).await;
        let next = apply_profile_result(&self.snapshot(), result);
        self.tx.send_replace(next);
    }

    /// Clear the session locally (explicit sign-out).
    pub fn sign_out(&self) {
        self.tx.send_replace(SessionSnapshot::signed_out());
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<SessionUser, FetchError> {
        let url = self
            .base_url
            .join("/api/v1/auth/me")
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthenticated);
        }
        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let envelope: ApiResponse<ProfileResponse> = response
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        envelope
            .data
            .ok_or_else(|| FetchError::Transport("profile envelope had no data".to_string()))?
            .into_user()
    }
}
