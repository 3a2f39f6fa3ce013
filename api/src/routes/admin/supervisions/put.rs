use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::supervision_service::{SupervisionForm, SupervisionService};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::service_error;

/// PUT /admin/supervisions/{supervision_id}
///
/// Replaces every field of the supervision. `404` if it does not exist.
pub async fn update_supervision(
    State(state): State<AppState>,
    Path(supervision_id): Path<i64>,
    Json(form): Json<SupervisionForm>,
) -> Response {
    match SupervisionService::update(state.db(), supervision_id, form).await {
        Ok(supervision) => (
            StatusCode::OK,
            Json(ApiResponse::success(supervision, "Supervision updated")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
