pub mod post;

use axum::{Router, routing::post};
use util::state::AppState;

/// - `POST /admin/applications/{application_id}/approve`
/// - `POST /admin/applications/{application_id}/reject`
pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/{application_id}/approve", post(post::approve))
        .route("/{application_id}/reject", post(post::reject))
}
