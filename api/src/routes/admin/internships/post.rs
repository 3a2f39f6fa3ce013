use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::internship_service::{CreateInternship, InternshipService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// POST /admin/internships
///
/// ### Request Body
/// ```json
/// {
///   "title": "Backend Intern",
///   "company": "Acme",
///   "location": "Pretoria",
///   "start_date": "2025-01-06",
///   "end_date": "2025-06-30",
///   "slots": "3",
///   "mentor_id": "7"
/// }
/// ```
///
/// Dates that are not `YYYY-MM-DD` are stored empty. A valid `mentor_id`
/// also creates an active supervision.
///
/// ### Responses
/// - `201 Created` with the internship
/// - `400 Bad Request` ("Title and company are required.")
pub async fn create_internship(
    State(state): State<AppState>,
    Json(req): Json<CreateInternship>,
) -> Response {
    match InternshipService::create(state.db(), req).await {
        Ok(internship) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(internship, "Internship created")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
