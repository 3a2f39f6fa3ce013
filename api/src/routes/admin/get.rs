use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::dashboard_service::{AdminDashboardQuery, DashboardService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// GET /admin/dashboard
///
/// ### Query Parameters
/// - `i_search_field`, `i_q`: internship filter on `title`, `company`,
///   `status`, or all three when the field is missing or unknown
/// - `search_field`, `q`: user search on `name`, `email` (default) or `role`
/// - `search_email`: older alias of `q` that always searches by email
/// - `page` (≥ 1), `page_size` (10, 20 or 50; anything else means 10)
///
/// Malformed values are normalised rather than rejected.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<AdminDashboardQuery>,
) -> Response {
    match DashboardService::admin(state.db(), &query).await {
        Ok(view) => (
            StatusCode::OK,
            Json(ApiResponse::success(view, "Dashboard retrieved")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
