//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → health check (public)
//! - `/auth` → signup and login (public)
//! - `/student` → student dashboard, applications and profile (`allow_student`)
//! - `/mentor` → mentor dashboard and profile (`allow_mentor`)
//! - `/admin` → administration, including the internship cascade delete (`allow_admin`)

use crate::auth::guards::{allow_admin, allow_mentor, allow_student};
use crate::routes::{
    admin::admin_routes, auth::auth_routes, health::health_routes, mentor::mentor_routes,
    student::student_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod admin;
pub mod auth;
pub mod common;
pub mod health;
pub mod mentor;
pub mod student;

/// Builds the application router for every HTTP endpoint, with `app_state`
/// already applied.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/student", student_routes().route_layer(from_fn(allow_student)))
        .nest("/mentor", mentor_routes().route_layer(from_fn(allow_mentor)))
        .nest("/admin", admin_routes().route_layer(from_fn(allow_admin)))
        .with_state(app_state)
}
