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

/// PUT /mentor/profile
///
/// Same rules as the student profile; mentors have no CV, so `cv_url` is ignored.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(mut req): Json<UpdateProfile>,
) -> Response {
    req.cv_url = None;

    match UserService::update_profile(state.db(), user.id(), req).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(updated, "Profile updated")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
