use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::error::ServiceError;

use crate::response::ApiResponse;

/// Maps a service failure to its HTTP status and error envelope.
///
/// Storage errors are logged and answered with a generic message so that
/// database details never reach the client.
pub fn service_error(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::Storage(e) => {
            tracing::error!(error = %e, "storage error while handling request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("An internal error occurred")),
            )
                .into_response();
        }
    };

    (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
}
