use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::internship_service::{InternshipService, UpdateInternship};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// PUT /admin/internships
///
/// Edits the internship named by `internship_id`, or the newest one whose
/// title (and company, when given) matches. Blank fields are left alone;
/// `status` must be `open`, `closed` or `draft` to take effect.
///
/// ### Responses
/// - `200 OK` with the updated internship
/// - `404 Not Found` ("Internship not found")
pub async fn update_internship(
    State(state): State<AppState>,
    Json(req): Json<UpdateInternship>,
) -> Response {
    match InternshipService::update(state.db(), req).await {
        Ok(internship) => (
            StatusCode::OK,
            Json(ApiResponse::success(internship, "Internship updated")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
