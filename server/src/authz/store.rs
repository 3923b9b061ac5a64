//! External permission store access.
//!
//! Domain-role capability checks consult the platform's `role_permissions`
//! table through a small trait so the cache and middleware are testable
//! without a database. Lookups run under a hard time budget; what happens
//! when the budget is exceeded is an explicit, configured policy
//! (fail-open by default), never a 5xx.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::PgPool;

use sb_common::types::{PermissionCode, RoleCode};

/// Permission store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query failed.
    #[error("permission store query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Store unreachable.
    #[error("permission store unavailable: {0}")]
    Unavailable(String),
}

/// Source of `(role_code, permission_code) -> granted` facts.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Whether the external store grants `permission` to `role`.
    async fn is_granted(
        &self,
        role: RoleCode,
        permission: PermissionCode,
    ) -> Result<bool, StoreError>;
}

/// `PostgreSQL`-backed permission store.
#[derive(Debug, Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn is_granted(
        &self,
        role: RoleCode,
        permission: PermissionCode,
    ) -> Result<bool, StoreError> {
        let row: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM role_permissions WHERE role_code = $1 AND permission_code = $2",
        )
        .bind(role.as_str())
        .bind(permission.code())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }
}

/// Outcome of a cached, budgeted lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The store grants the permission.
    Granted,
    /// The store does not grant the permission.
    Denied,
    /// The store failed or timed out and the fail-open policy granted.
    FailOpen,
}

/// Advisory cache over a [`PermissionStore`] with a lookup time budget.
///
/// The key space is small and finite (roles x permission codes), so
/// entries are never evicted. Concurrent requests may populate the same
/// key redundantly; entries are idempotent per key, last write wins.
pub struct CachedPermissionStore {
    inner: Arc<dyn PermissionStore>,
    cache: DashMap<(RoleCode, PermissionCode), bool>,
    timeout: Duration,
    fail_open: bool,
}

impl CachedPermissionStore {
    /// Wrap a store with the given lookup budget and failure policy.
    #[must_use]
    pub fn new(inner: Arc<dyn PermissionStore>, timeout: Duration, fail_open: bool) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            timeout,
            fail_open,
        }
    }

    /// Resolve a capability lookup through the cache.
    ///
    /// A grant produced by the fail-open policy is cached as a plain
    /// grant; later calls for the same key return `Granted`.
    pub async fn is_granted(&self, role: RoleCode, permission: PermissionCode) -> LookupOutcome {
        let key = (role, permission);
        if let Some(cached) = self.cache.get(&key) {
            return if *cached {
                LookupOutcome::Granted
            } else {
                LookupOutcome::Denied
            };
        }

        match tokio::time::timeout(self.timeout, self.inner.is_granted(role, permission)).await {
            Ok(Ok(granted)) => {
                self.cache.insert(key, granted);
                if granted {
                    LookupOutcome::Granted
                } else {
                    LookupOutcome::Denied
                }
            }
            Ok(Err(e)) => self.resolve_failure(role, permission, &e.to_string()),
            Err(_) => self.resolve_failure(
                role,
                permission,
                &format!("lookup exceeded {:?} budget", self.timeout),
            ),
        }
    }

    fn resolve_failure(
        &self,
        role: RoleCode,
        permission: PermissionCode,
        cause: &str,
    ) -> LookupOutcome {
        if self.fail_open {
            tracing::warn!(
                role = %role,
                permission = %permission,
                cause,
                "permission lookup failed, allowing access (fail-open)"
            );
            self.cache.insert((role, permission), true);
            LookupOutcome::FailOpen
        } else {
            tracing::warn!(
                role = %role,
                permission = %permission,
                cause,
                "permission lookup failed, denying access (fail-closed)"
            );
            LookupOutcome::Denied
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What the mock store does on each lookup.
    #[derive(Debug, Clone, Copy)]
    pub(crate) enum MockBehavior {
        Grant,
        Deny,
        Fail,
        Hang,
    }

    /// In-memory stand-in for the external permission store.
    pub(crate) struct MockStore {
        behavior: MockBehavior,
        calls: AtomicUsize,
    }

    impl MockStore {
        pub(crate) fn new(behavior: MockBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PermissionStore for MockStore {
        async fn is_granted(
            &self,
            _role: RoleCode,
            _permission: PermissionCode,
        ) -> Result<bool, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                MockBehavior::Grant => Ok(true),
                MockBehavior::Deny => Ok(false),
                MockBehavior::Fail => {
                    Err(StoreError::Unavailable("connection refused".to_string()))
                }
                MockBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(true)
                }
            }
        }
    }
}
