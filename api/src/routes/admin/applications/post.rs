use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::application_service::{ApplicationService, ReviewOutcome};
use services::error::ServiceResult;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;

fn review_response(result: ServiceResult<ReviewOutcome>, verb: &str) -> Response {
    match result {
        Ok(ReviewOutcome::Reviewed(application)) => (
            StatusCode::OK,
            Json(ApiResponse::success(application, format!("Application {verb}"))),
        )
            .into_response(),
        Ok(ReviewOutcome::Unchanged(application)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                application,
                "Application is no longer pending; nothing changed",
            )),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}

/// POST /admin/applications/{application_id}/approve
///
/// Only a pending application changes. `404` if it does not exist.
pub async fn approve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(application_id): Path<i64>,
) -> Response {
    let result = ApplicationService::approve(state.db(), application_id, user.id()).await;
    review_response(result, "approved")
}

/// POST /admin/applications/{application_id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(application_id): Path<i64>,
) -> Response {
    let result = ApplicationService::reject(state.db(), application_id, user.id()).await;
    review_response(result, "rejected")
}
