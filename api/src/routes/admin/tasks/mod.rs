pub mod delete;
pub mod post;

use axum::{
    Router,
    routing::{delete, post},
};
use util::state::AppState;

/// - `POST /admin/tasks` → `create_task`
/// - `DELETE /admin/tasks/{task_id}` → `delete_task`
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::create_task))
        .route("/{task_id}", delete(delete::delete_task))
}
