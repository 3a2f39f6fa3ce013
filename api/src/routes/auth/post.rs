use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::{Model as User, Role};
use serde::{Deserialize, Serialize};
use services::user_service::{SignupRequest, UserService};
use util::state::AppState;

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::service_error;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub role: Role,
    pub token: String,
    pub expires_at: String,
    /// Dashboard the client should open next.
    pub redirect: &'static str,
}

fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Student => "/student_dash",
        Role::Mentor => "/mentor_dash",
        Role::Admin => "/admin_dash",
    }
}

fn issue_token(user: User, status: StatusCode, message: &str) -> Response {
    match generate_jwt(user.id, user.role) {
        Ok((token, expires_at)) => {
            let role = user.role;
            let body = AuthResponse {
                user,
                role,
                token,
                expires_at,
                redirect: dashboard_for(role),
            };
            (status, Json(ApiResponse::success(body, message))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = user.id, "token encoding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("An internal error occurred")),
            )
                .into_response()
        }
    }
}

/// POST /auth/signup
///
/// Registers a student account and signs it in.
///
/// ### Request Body
/// ```json
/// { "role": "student", "name": "Ada", "email": "ada@uni.ac.za", "phone": null, "password": "secret1" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ user, role, token, expires_at, redirect }`
/// - `400 Bad Request` ("Only students can sign up.", validation messages)
/// - `409 Conflict` ("Email already registered.")
pub async fn signup(State(state): State<AppState>, Json(req): Json<SignupRequest>) -> Response {
    match UserService::signup(state.db(), req).await {
        Ok(user) => issue_token(user, StatusCode::CREATED, "Account created"),
        Err(e) => service_error(e),
    }
}

/// POST /auth/login
///
/// ### Responses
/// - `200 OK` with `{ user, role, token, expires_at, redirect }`
/// - `401 Unauthorized` ("Invalid email or password.")
/// - `403 Forbidden` ("Account is inactive.")
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match UserService::login(state.db(), &req.email, &req.password).await {
        Ok(user) => issue_token(user, StatusCode::OK, "Login successful"),
        Err(e) => service_error(e),
    }
}
