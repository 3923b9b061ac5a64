//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod admin;
pub mod marketplace;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use sb_common::policy::AccessPolicy;
use sb_common::protocol::ApiResponse;
use sb_common::types::Identity;

use crate::auth::{self, CurrentIdentity};
use crate::authz::CachedPermissionStore;
use crate::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Shared access policy (permission table + break-glass list)
    pub policy: Arc<AccessPolicy>,
    /// Cached external permission store
    pub permissions: Arc<CachedPermissionStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, policy: AccessPolicy, permissions: CachedPermissionStore) -> Self {
        Self {
            config: Arc::new(config),
            policy: Arc::new(policy),
            permissions: Arc::new(permissions),
        }
    }
}

/// Create the main application router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every /api/v1 route sits behind identity resolution; each protected
    // area then layers its own authorization gate.
    let api = Router::new()
        .route("/auth/me", get(me))
        .nest("/admin", admin::router(state.clone()))
        .merge(marketplace::router(state.clone()))
        .layer(from_fn_with_state(state, auth::require_auth));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// The signed-in identity as the authorization layer resolved it.
///
/// The console session store polls this to populate its role state.
async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<ApiResponse<Identity>> {
    Json(ApiResponse::ok("ok", identity))
}

async fn health_check() -> &'static str {
    "OK"
}
