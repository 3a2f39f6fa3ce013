pub mod delete;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{delete, post, put},
};
use util::state::AppState;

/// - `POST /admin/internships` → `create_internship`
/// - `PUT /admin/internships` → `update_internship` (target chosen by body)
/// - `DELETE /admin/internships/{internship_id}` → `delete_internship`
pub fn internship_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::create_internship))
        .route("/", put(put::update_internship))
        .route("/{internship_id}", delete(delete::delete_internship))
}
