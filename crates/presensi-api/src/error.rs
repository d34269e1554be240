//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": <message>, "kind": <kind>}`. Conflicts that
//! concern an existing submission also carry it under `"submission"`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use presensi_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No [`presensi_core::actor::Actor`] was attached to the request.
  #[error("authentication required")]
  Unauthorized,

  #[error(transparent)]
  Attendance(#[from] CoreError),
}

/// HTTP status for a core error.
pub fn status_of(e: &CoreError) -> StatusCode {
  match e {
    CoreError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    CoreError::InvalidSchedule(_) => StatusCode::BAD_REQUEST,
    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
    CoreError::SessionNotFound(_) | CoreError::SubmissionNotFound(_) => StatusCode::NOT_FOUND,
    CoreError::DuplicateDay(_)
    | CoreError::SessionNotActive(_)
    | CoreError::AlreadySubmitted { .. }
    | CoreError::AlreadyDecided { .. } => StatusCode::CONFLICT,
    CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        json!({ "error": self.to_string(), "kind": "unauthorized" }),
      ),
      ApiError::Attendance(e) => {
        let status = status_of(e);
        if status.is_server_error() {
          tracing::error!(error = %e, "request failed");
        }
        let mut body = json!({ "error": e.to_string(), "kind": e.kind() });
        match e {
          CoreError::AlreadySubmitted { existing } => body["submission"] = json!(existing),
          CoreError::AlreadyDecided { current } => body["submission"] = json!(current),
          CoreError::Validation { field, .. } => body["field"] = json!(field),
          _ => {}
        }
        (status, body)
      }
    };
    (status, Json(body)).into_response()
  }
}
