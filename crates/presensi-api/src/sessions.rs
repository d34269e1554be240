//! Handlers for `/sessions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sessions` | Sweeps auto-close first |
//! | `POST` | `/sessions` | Admin. Body: `{"day_number":1,"day_title":"..","auto_close_time":null}` |
//! | `GET`  | `/sessions/active` | The open session or `null` |
//! | `GET`  | `/sessions/closing-soon` | Optional `?within_secs=300` |
//! | `GET`  | `/sessions/{id}` | 404 if not found |
//! | `POST` | `/sessions/{id}/activate` | Admin |
//! | `POST` | `/sessions/{id}/deactivate` | Admin |
//! | `PUT`  | `/sessions/{id}/auto-close` | Admin. Body: `{"auto_close_time":"..."}` or `null` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Duration, Utc};
use presensi_core::{
  Attendance,
  autoclose::DEFAULT_WARNING_WINDOW_SECS,
  session::{Activation, AttendanceSession, NewSession, Transition},
  store::AttendanceStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::CurrentActor, error::ApiError};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /sessions`
pub async fn list<S>(
  State(app): State<Arc<Attendance<S>>>,
) -> Result<Json<Vec<AttendanceSession>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.list_sessions().await?))
}

/// `GET /sessions/active`
pub async fn active<S>(
  State(app): State<Arc<Attendance<S>>>,
) -> Result<Json<Option<AttendanceSession>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.active_session().await?))
}

#[derive(Debug, Deserialize)]
pub struct ClosingSoonParams {
  pub within_secs: Option<u32>,
}

/// `GET /sessions/closing-soon[?within_secs=<n>]`
pub async fn closing_soon<S>(
  State(app): State<Arc<Attendance<S>>>,
  Query(params): Query<ClosingSoonParams>,
) -> Result<Json<Vec<AttendanceSession>>, ApiError>
where
  S: AttendanceStore,
{
  let window = params
    .within_secs
    .map_or(DEFAULT_WARNING_WINDOW_SECS, i64::from);
  Ok(Json(app.closing_soon(Duration::seconds(window)).await?))
}

/// `GET /sessions/{id}`
pub async fn get_one<S>(
  State(app): State<Arc<Attendance<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AttendanceSession>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.get_session(id).await?))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /sessions`
pub async fn create<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewSession>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  let session = app.create_session(body, &actor).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /sessions/{id}/activate`
pub async fn activate<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Activation>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.set_session_active(id, &actor).await?))
}

/// `POST /sessions/{id}/deactivate`
pub async fn deactivate<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Transition>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.set_session_inactive(id, &actor).await?))
}

#[derive(Debug, Deserialize)]
pub struct AutoCloseBody {
  pub auto_close_time: Option<DateTime<Utc>>,
}

/// `PUT /sessions/{id}/auto-close`
pub async fn set_auto_close<S>(
  State(app): State<Arc<Attendance<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<AutoCloseBody>,
) -> Result<Json<AttendanceSession>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(app.set_auto_close(id, body.auto_close_time, &actor).await?))
}
