//! `/mentor` routes, guarded by `allow_mentor`.

pub mod get;
pub mod put;

use axum::{
    Router,
    routing::{get, put},
};
use util::state::AppState;

pub fn mentor_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get::dashboard))
        .route("/profile", put(put::update_profile))
}
