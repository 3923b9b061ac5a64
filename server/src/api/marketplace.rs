//! Marketplace (application-surface) routes.
//!
//! Domain roles reach these through their permission sets; the handlers
//! themselves stay thin, the business CRUD lives elsewhere.

use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use sb_common::protocol::ApiResponse;
use sb_common::types::PermissionCode;

use crate::authz;

use super::AppState;

/// Build the marketplace router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let jobs = Router::new().route("/jobs", get(list_jobs)).layer(
        from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_permission(s, PermissionCode::JobsView, req, next).await
            },
        ),
    );

    let bids = Router::new().route("/bids", post(create_bid)).layer(
        from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_permission(s, PermissionCode::BidsCreate, req, next).await
            },
        ),
    );

    let projects = Router::new().route("/projects", get(list_projects)).layer(
        from_fn_with_state(
            state,
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_permission(s, PermissionCode::ProjectsView, req, next).await
            },
        ),
    );

    Router::new().merge(jobs).merge(bids).merge(projects)
}

async fn list_jobs() -> Json<ApiResponse<Vec<Value>>> {
    Json(ApiResponse::ok("ok", Vec::new()))
}

async fn create_bid() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok("Bid submitted", json!({ "status": "pending" })))
}

async fn list_projects() -> Json<ApiResponse<Vec<Value>>> {
    Json(ApiResponse::ok("ok", Vec::new()))
}
