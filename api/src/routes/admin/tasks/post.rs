use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::task_service::{CreateTask, TaskService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// POST /admin/tasks
///
/// ### Request Body
/// ```json
/// {
///   "title": "Write report",
///   "mentor_id": 4,
///   "student_id": 9,
///   "supervision_id": 1,
///   "deadline": "2025-03-01",
///   "description": "First draft"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the task (status `assigned`)
/// - `400 Bad Request` when `deadline` is not `YYYY-MM-DD`
pub async fn create_task(State(state): State<AppState>, Json(req): Json<CreateTask>) -> Response {
    match TaskService::create(state.db(), req).await {
        Ok(task) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(task, "Task assigned")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
