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

/// GET /mentor/dashboard
///
/// Profile, departments, the mentor's supervisions and the tasks they assigned.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match DashboardService::mentor(state.db(), user.id()).await {
        Ok(view) => (
            StatusCode::OK,
            Json(ApiResponse::success(view, "Dashboard retrieved")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
