pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{post, put},
};
use util::state::AppState;

/// - `POST /admin/supervisions` → `create_supervision`
/// - `PUT /admin/supervisions/{supervision_id}` → `update_supervision`
pub fn supervision_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::create_supervision))
        .route("/{supervision_id}", put(put::update_supervision))
}
