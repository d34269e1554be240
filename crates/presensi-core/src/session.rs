//! Attendance sessions: one attendance-taking window per event day.
//!
//! At most one session is active at any instant. That rule is a property of
//! the store, not of any in-process singleton: every "which session is open?"
//! question is answered by querying it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSession {
  pub session_id:      Uuid,
  /// Natural key; unique across all sessions.
  pub day_number:      u32,
  pub day_title:       String,
  pub is_active:       bool,
  /// Set each time the session is activated.
  pub start_time:      Option<DateTime<Utc>>,
  /// Set when the session is deactivated, cleared on reactivation.
  pub end_time:        Option<DateTime<Utc>>,
  /// Absolute instant after which the session must close itself.
  pub auto_close_time: Option<DateTime<Utc>>,
  pub created_by:      String,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl AttendanceSession {
  /// A fresh, inactive session as it is first written to the store.
  pub fn new(input: NewSession, created_by: impl Into<String>, now: DateTime<Utc>) -> Self {
    Self {
      session_id:      Uuid::new_v4(),
      day_number:      input.day_number,
      day_title:       input.day_title,
      is_active:       false,
      start_time:      None,
      end_time:        None,
      auto_close_time: input.auto_close_time,
      created_by:      created_by.into(),
      created_at:      now,
      updated_at:      now,
    }
  }
}

/// Input to [`crate::lifecycle::SessionManager::create`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
  pub day_number:      u32,
  pub day_title:       String,
  #[serde(default)]
  pub auto_close_time: Option<DateTime<Utc>>,
}

// ─── Derived state ───────────────────────────────────────────────────────────

/// Where a session sits in its lifecycle, computed from its fields and the
/// current time. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
  /// Created but never opened.
  Inactive,
  Active,
  /// Still flagged active but past its auto-close time; the next sweep will
  /// close it.
  ActiveOverdue,
  /// Deactivated manually or by auto-close.
  Closed,
}

impl SessionState {
  pub fn accepts_submissions(self) -> bool { matches!(self, Self::Active) }
}

// ─── Transition results ──────────────────────────────────────────────────────

/// Result of a manual deactivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
  pub session: AttendanceSession,
  /// `false` when the session was already inactive and nothing was written.
  pub changed: bool,
}

/// Result of an activation, including every session it implicitly closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
  pub session:            AttendanceSession,
  pub deactivated:        Vec<Uuid>,
  /// `false` when the target was already the active session and nothing was
  /// written.
  pub changed:            bool,
  /// An auto-close time that had already passed when the session was opened.
  /// It is cleared so the new window is not closed by the next sweep.
  pub cleared_auto_close: Option<DateTime<Utc>>,
}
