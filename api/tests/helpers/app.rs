use api::auth::generate_jwt;
use api::routes::routes;
use axum::{Router, body::Body, http::Request, response::Response};
use ctor::ctor;
use db::models::user::{Model as User, NewUser, Role};
use serde_json::Value;
use std::convert::Infallible;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::state::AppState;

pub type TestApp = BoxCloneService<Request<Body>, Response, Infallible>;

#[ctor]
fn setup_tests() {
    unsafe {
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "api-test-secret");
        std::env::set_var("JWT_DURATION_MINUTES", "60");
        std::env::set_var("DB_RETRY_BASE_DELAY_MS", "1");
    }
}

/// Router over a fresh, migrated in-memory database. The state is returned
/// so tests can seed and inspect rows directly.
pub async fn make_test_app() -> (TestApp, AppState) {
    let db = db::test_utils::setup_test_db().await;
    let app_state = AppState::new(db);

    let router: Router = Router::new()
        .nest("/api", routes(app_state.clone()))
        .with_state(app_state.clone());

    (router.into_service::<Body>().boxed_clone(), app_state)
}

pub async fn create_user(app_state: &AppState, role: Role, email: &str) -> User {
    User::create(
        app_state.db(),
        NewUser {
            name: "Test User",
            email,
            password: "password1",
            role,
            phone: None,
            department_id: None,
        },
    )
    .await
    .unwrap()
}

pub fn bearer(user: &User) -> String {
    let (token, _) = generate_jwt(user.id, user.role).unwrap();
    format!("Bearer {token}")
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
