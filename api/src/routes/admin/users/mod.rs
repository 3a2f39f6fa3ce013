pub mod delete;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{delete, post, put},
};
use util::state::AppState;

/// - `POST /admin/users` → `create_user`
/// - `PUT /admin/users/{user_id}` → `update_user`
/// - `DELETE /admin/users/{user_id}` → `delete_user`
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::create_user))
        .route("/{user_id}", put(put::update_user))
        .route("/{user_id}", delete(delete::delete_user))
}
