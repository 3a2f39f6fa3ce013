use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::user_service::UserService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// DELETE /admin/users/{user_id}
///
/// ### Responses
/// - `200 OK` ("User deleted")
/// - `403 Forbidden` ("You cannot delete your own account.")
/// - `404 Not Found`
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Response {
    match UserService::delete(state.db(), admin.id(), user_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success((), "User deleted"))).into_response(),
        Err(e) => service_error(e),
    }
}
