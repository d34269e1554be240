//! Handlers for the admin review queue.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/approvals/pending` | Oldest first |
//! | `POST` | `/submissions/{id}/decision` | Body: `{"decision":"approved","feedback_admin":"..."}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use presensi_core::{
  Attendance,
  store::AttendanceStore,
  submission::{AttendanceSubmission, Decision},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::CurrentActor, error::ApiError};

/// `GET /approvals/pending`
pub async fn pending<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<AttendanceSubmission>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.list_pending_approvals(&actor).await?))
}

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
  pub decision:       Decision,
  #[serde(default)]
  pub feedback_admin: Option<String>,
}

/// `POST /submissions/{id}/decision`
pub async fn decide<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<AttendanceSubmission>, ApiError>
where
  S: AttendanceStore,
{
  let submission = app
    .decide_approval(id, body.decision, body.feedback_admin, &actor)
    .await?;
  Ok(Json(submission))
}
