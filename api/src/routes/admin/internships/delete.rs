use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::internship_removal::{RemovalCounts, RemovalOutcome};
use services::internship_service::InternshipService;
use util::state::AppState;

use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct RemovalResponse {
    pub outcome: &'static str,
    pub counts: Option<RemovalCounts>,
}

/// DELETE /admin/internships/{internship_id}
///
/// Removes the internship and everything hanging off it (supervisions and
/// their tasks, submissions and feedback, reports, applications) in a single
/// transaction. Lock contention is retried; the client only sees the result.
///
/// ### Responses
/// - `200 OK`: removed
/// ```json
/// {
///   "success": true,
///   "data": {
///     "outcome": "deleted",
///     "counts": {
///       "feedback": 1, "task_submissions": 2, "tasks": 2, "reports": 1,
///       "applications": 3, "supervisions": 1, "internships": 1
///     }
///   },
///   "message": "Internship deleted"
/// }
/// ```
/// - `200 OK`: nothing to remove; the request is a no-op
/// ```json
/// { "success": true, "data": { "outcome": "not_found", "counts": null }, "message": "Internship not found" }
/// ```
/// - `500 Internal Server Error`: removal failed and was rolled back. The
///   cause is logged, not returned.
pub async fn delete_internship(
    State(state): State<AppState>,
    Path(internship_id): Path<i64>,
) -> Response {
    let outcome = InternshipService::delete(state.db(), internship_id).await;
    let label = outcome.label();

    match outcome {
        RemovalOutcome::Deleted(counts) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RemovalResponse { outcome: label, counts: Some(counts) },
                "Internship deleted",
            )),
        )
            .into_response(),
        RemovalOutcome::NotFound => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RemovalResponse { outcome: label, counts: None },
                "Internship not found",
            )),
        )
            .into_response(),
        RemovalOutcome::Failed { attempts, diagnostic } => {
            tracing::error!(internship_id, attempts, %diagnostic, "internship delete request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    success: false,
                    data: RemovalResponse { outcome: label, counts: None },
                    message: "Failed to delete internship".to_string(),
                }),
            )
                .into_response()
        }
    }
}
