use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::user_service::{UpdateUser, UserService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// PUT /admin/users/{user_id}
///
/// Non-blank fields overwrite. `role` and `status` are ignored unless they
/// name a known value.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUser>,
) -> Response {
    match UserService::update(state.db(), user_id, req).await {
        Ok(user) => (StatusCode::OK, Json(ApiResponse::success(user, "User updated"))).into_response(),
        Err(e) => service_error(e),
    }
}
