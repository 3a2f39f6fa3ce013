use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::dashboard_service::DashboardService;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// GET /student/dashboard
///
/// Internships on offer, the caller's applications with counts, and the
/// internship they are currently placed on (if any).
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match DashboardService::student(state.db(), user.id()).await {
        Ok(view) => (
            StatusCode::OK,
            Json(ApiResponse::success(view, "Dashboard retrieved")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
