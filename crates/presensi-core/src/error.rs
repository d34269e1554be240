//! Error types for `presensi-core`.
//!
//! Every operation recovers at its boundary and returns one of these variants;
//! callers branch on [`Error::kind`] to pick a user-facing message.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::submission::AttendanceSubmission;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid {field}: {message}")]
  Validation {
    field:   &'static str,
    message: String,
  },

  #[error("a session for day {0} already exists")]
  DuplicateDay(u32),

  #[error("auto-close time {0} is not in the future")]
  InvalidSchedule(DateTime<Utc>),

  #[error("session not found: {0}")]
  SessionNotFound(Uuid),

  #[error("submission not found: {0}")]
  SubmissionNotFound(Uuid),

  #[error("session {0} is not accepting submissions")]
  SessionNotActive(Uuid),

  /// The participant already has a submission for this session. Carries the
  /// stored record so the caller can show its current approval state.
  #[error("{} has already submitted attendance for this session", .existing.user_email)]
  AlreadySubmitted { existing: Box<AttendanceSubmission> },

  #[error("submission {} has already been {}", .current.submission_id, .current.approval_status)]
  AlreadyDecided { current: Box<AttendanceSubmission> },

  #[error("{0} is not allowed to perform this operation")]
  Forbidden(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
    Self::Validation { field, message: message.into() }
  }

  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Stable, machine-readable name for the variant.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Validation { .. } => "validation",
      Self::DuplicateDay(_) => "duplicate_day",
      Self::InvalidSchedule(_) => "invalid_schedule",
      Self::SessionNotFound(_) | Self::SubmissionNotFound(_) => "not_found",
      Self::SessionNotActive(_) => "session_not_active",
      Self::AlreadySubmitted { .. } => "already_submitted",
      Self::AlreadyDecided { .. } => "already_decided",
      Self::Forbidden(_) => "forbidden",
      Self::Store(_) => "store",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
