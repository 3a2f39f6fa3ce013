use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::supervision_service::{SupervisionForm, SupervisionService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// POST /admin/supervisions
///
/// ### Request Body
/// ```json
/// { "mentor_id": 4, "internship_id": 2, "student_id": 9, "active": "true", "notes": "API work" }
/// ```
///
/// `active` is true unless given as something other than `"true"`; blank
/// notes are stored empty.
pub async fn create_supervision(
    State(state): State<AppState>,
    Json(form): Json<SupervisionForm>,
) -> Response {
    match SupervisionService::create(state.db(), form).await {
        Ok(supervision) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(supervision, "Supervision assigned")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
