//! `/admin` routes. The whole group sits behind `allow_admin`.
//!
//! ## Structure
//! - `get.rs`: the dashboard with internship and user search
//! - `applications/`: approve / reject
//! - `internships/`: create, edit, cascade delete
//! - `supervisions/`: assign and edit mentor supervision
//! - `tasks/`: assign and delete tasks
//! - `users/`: account management

pub mod applications;
pub mod get;
pub mod internships;
pub mod supervisions;
pub mod tasks;
pub mod users;

use axum::{Router, routing::get};
use util::state::AppState;

use applications::application_routes;
use internships::internship_routes;
use supervisions::supervision_routes;
use tasks::task_routes;
use users::user_routes;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get::dashboard))
        .nest("/applications", application_routes())
        .nest("/internships", internship_routes())
        .nest("/supervisions", supervision_routes())
        .nest("/tasks", task_routes())
        .nest("/users", user_routes())
}
