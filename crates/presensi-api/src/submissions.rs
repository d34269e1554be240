//! Handlers for attendance submissions.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sessions/{id}/submissions` | Submits as the caller |
//! | `GET`  | `/sessions/{id}/submissions` | Admin |
//! | `GET`  | `/sessions/{id}/submissions/mine` | `{"exists":..,"submission":..}` |
//! | `GET`  | `/submissions/mine` | Caller's history, newest first |
//!
//! The participant's email always comes from the authenticated caller, never
//! from the body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use presensi_core::{
  Attendance,
  store::AttendanceStore,
  submission::{AttendanceStatus, AttendanceSubmission, Participant, SubmissionCheck, SubmitRequest},
  validate,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::CurrentActor, error::ApiError};

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub full_name:            String,
  pub username:             String,
  pub status_kehadiran:     AttendanceStatus,
  pub reason:               String,
  /// `HH:MM` or `HH:MM:SS`.
  #[serde(default)]
  pub scheduled_clock_time: Option<String>,
  #[serde(default)]
  pub evidence_photo_url:   Option<String>,
}

/// `POST /sessions/{id}/submissions`
pub async fn submit<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(session_id): Path<Uuid>,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  let scheduled_clock_time = validate::optional(body.scheduled_clock_time.as_deref())
    .map(|t| validate::clock_time(&t))
    .transpose()?;

  let request = SubmitRequest {
    session_id,
    participant: Participant {
      email:     actor.email,
      full_name: body.full_name,
      username:  body.username,
    },
    status: body.status_kehadiran,
    reason: body.reason,
    scheduled_clock_time,
    evidence_photo_url: body.evidence_photo_url,
  };

  let admission = app.submit_attendance(request).await?;
  Ok((StatusCode::CREATED, Json(admission)))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /sessions/{id}/submissions`
pub async fn list_for_session<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<AttendanceSubmission>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.session_submissions(session_id, &actor).await?))
}

/// `GET /sessions/{id}/submissions/mine`
pub async fn mine<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(session_id): Path<Uuid>,
) -> Result<Json<SubmissionCheck>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.check_submission(&actor.email, session_id).await?))
}

/// `GET /submissions/mine`
pub async fn history<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<AttendanceSubmission>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.submission_history(&actor.email).await?))
}
