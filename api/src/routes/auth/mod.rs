//! `/auth` routes: student self-registration and login. Both are public.

pub mod post;

use axum::{Router, routing::post};
use util::state::AppState;

use post::{login, signup};

/// - `POST /auth/signup` → `signup`
/// - `POST /auth/login` → `login`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
