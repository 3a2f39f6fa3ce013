//! `/student` routes. Every route requires a student token (`allow_student`).

pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{get, post, put},
};
use util::state::AppState;

use get::dashboard;
use post::{apply, withdraw};
use put::update_profile;

/// - `GET /student/dashboard` → `dashboard`
/// - `POST /student/apply` → `apply`
/// - `POST /student/withdraw` → `withdraw`
/// - `PUT /student/profile` → `update_profile`
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/apply", post(apply))
        .route("/withdraw", post(withdraw))
        .route("/profile", put(update_profile))
}
