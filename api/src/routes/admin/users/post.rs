use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::user_service::{CreateUser, UserService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// POST /admin/users
///
/// ### Request Body
/// ```json
/// {
///   "name": "Thabo",
///   "email": "thabo@uni.ac.za",
///   "password": "changeme",
///   "role": "mentor",
///   "department_name": "Computer Science"
/// }
/// ```
///
/// Unknown roles become `student`. `department_name` is matched without
/// regard to case and created when missing.
///
/// ### Responses
/// - `201 Created`
/// - `409 Conflict` ("Email already exists.")
pub async fn create_user(State(state): State<AppState>, Json(req): Json<CreateUser>) -> Response {
    match UserService::create(state.db(), req).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(user, "User created")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
