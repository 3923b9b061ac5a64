//! Admin console routes.
//!
//! Thin handlers; the interesting part is the gate in front of each area.
//! User management checks fine-grained permissions, the finance, support,
//! and moderation areas are gated by role membership the way the console
//! sections declare their allowed roles.

use axum::{
    extract::{Path, Request, State},
    middleware::{from_fn_with_state, Next},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use sb_common::protocol::ApiResponse;
use sb_common::types::{PermissionCode, RoleCode};

use crate::authz;

use super::AppState;

/// Build the `/admin` router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let users = Router::new().route("/users", get(list_users)).layer(
        from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_permission(s, PermissionCode::UsersView, req, next).await
            },
        ),
    );

    let suspend = Router::new()
        .route("/users/{id}/suspend", post(suspend_user))
        .layer(from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_permission(s, PermissionCode::UsersSuspend, req, next).await
            },
        ));

    let settings = Router::new().route("/settings", get(settings_area)).layer(
        from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_permission(s, PermissionCode::SystemSettings, req, next).await
            },
        ),
    );

    let finance = Router::new()
        .route("/finance/payouts", get(finance_payouts))
        .layer(from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_role_membership(s, &[RoleCode::Finance], req, next).await
            },
        ));

    let support = Router::new()
        .route("/support/tickets", get(support_tickets))
        .layer(from_fn_with_state(
            state.clone(),
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_role_membership(s, &[RoleCode::Support], req, next).await
            },
        ));

    let moderation = Router::new()
        .route("/moderation/queue", get(moderation_queue))
        .layer(from_fn_with_state(
            state,
            |State(s): State<AppState>, req: Request, next: Next| async move {
                authz::require_role_membership(s, &[RoleCode::Moderator], req, next).await
            },
        ));

    Router::new()
        .merge(users)
        .merge(suspend)
        .merge(settings)
        .merge(finance)
        .merge(support)
        .merge(moderation)
}

async fn list_users() -> Json<ApiResponse<Vec<Value>>> {
    Json(ApiResponse::ok("ok", Vec::new()))
}

async fn suspend_user(Path(id): Path<Uuid>) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(
        "User suspended",
        json!({ "user_id": id, "status": "suspended" }),
    ))
}

async fn settings_area() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok("ok", json!({ "settings": {} })))
}

async fn finance_payouts() -> Json<ApiResponse<Vec<Value>>> {
    Json(ApiResponse::ok("ok", Vec::new()))
}

async fn support_tickets() -> Json<ApiResponse<Vec<Value>>> {
    Json(ApiResponse::ok("ok", Vec::new()))
}

async fn moderation_queue() -> Json<ApiResponse<Vec<Value>>> {
    Json(ApiResponse::ok("ok", Vec::new()))
}
