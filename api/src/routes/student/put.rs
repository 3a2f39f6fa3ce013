use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::user_service::{UpdateProfile, UserService};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// PUT /student/profile
///
/// Blank fields are left unchanged; an empty `phone` clears it.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfile>,
) -> Response {
    match UserService::update_profile(state.db(), user.id(), req).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(updated, "Profile updated")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
