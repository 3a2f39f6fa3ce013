use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::task_service::TaskService;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// DELETE /admin/tasks/{task_id}
///
/// Submissions for the task and their feedback go with it.
pub async fn delete_task(State(state): State<AppState>, Path(task_id): Path<i64>) -> Response {
    match TaskService::delete(state.db(), task_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success((), "Task deleted"))).into_response(),
        Err(e) => service_error(e),
    }
}
