use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::application_service::{ApplicationService, ApplyOutcome};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;

#[derive(Debug, Deserialize)]
pub struct InternshipRef {
    pub internship_id: i64,
}

/// POST /student/apply
///
/// ### Request Body
/// ```json
/// { "internship_id": 3 }
/// ```
///
/// ### Responses
/// - `201 Created` with the new pending application
/// - `200 OK` ("Already applied") when an application exists; nothing changes
/// - `404 Not Found` ("Internship not found")
pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<InternshipRef>,
) -> Response {
    match ApplicationService::apply(state.db(), user.id(), req.internship_id).await {
        Ok(ApplyOutcome::Applied(application)) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(application, "Application submitted")),
        )
            .into_response(),
        Ok(ApplyOutcome::AlreadyApplied(application)) => (
            StatusCode::OK,
            Json(ApiResponse::success(application, "Already applied")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}

/// POST /student/withdraw
///
/// Removes the caller's application only while it is still pending.
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<InternshipRef>,
) -> Response {
    match ApplicationService::withdraw(state.db(), user.id(), req.internship_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(true, "Application withdrawn")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::OK,
            Json(ApiResponse::success(false, "No pending application to withdraw")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
