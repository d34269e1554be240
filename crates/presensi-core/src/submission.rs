//! Attendance submissions and their approval sub-state.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Attendance status ───────────────────────────────────────────────────────

/// What the participant reports for the day.
///
/// Serialised with the Indonesian labels the portal shows to participants;
/// parsing also accepts the English snake_case names.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
  #[serde(rename = "Hadir", alias = "present")]
  #[strum(to_string = "Hadir", serialize = "present")]
  Present,
  #[serde(rename = "Tidak Hadir", alias = "absent")]
  #[strum(to_string = "Tidak Hadir", serialize = "absent")]
  Absent,
  #[serde(rename = "Menyusul", alias = "arriving_late")]
  #[strum(to_string = "Menyusul", serialize = "arriving_late")]
  ArrivingLate,
  #[serde(rename = "Meninggalkan", alias = "leaving_early")]
  #[strum(to_string = "Meninggalkan", serialize = "leaving_early")]
  LeavingEarly,
}

impl AttendanceStatus {
  /// Arriving late and leaving early both name the time of day involved.
  pub fn requires_clock_time(self) -> bool {
    matches!(self, Self::ArrivingLate | Self::LeavingEarly)
  }

  /// Everything other than plain attendance needs photographic evidence.
  pub fn requires_evidence(self) -> bool { !matches!(self, Self::Present) }
}

// ─── Approval ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl ApprovalStatus {
  pub fn is_decided(self) -> bool { !matches!(self, Self::Pending) }
}

/// An admin's verdict on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
  Approved,
  Rejected,
}

impl From<Decision> for ApprovalStatus {
  fn from(d: Decision) -> Self {
    match d {
      Decision::Approved => Self::Approved,
      Decision::Rejected => Self::Rejected,
    }
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// One participant's attendance record for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSubmission {
  pub submission_id:        Uuid,
  pub session_id:           Uuid,
  pub user_email:           String,
  pub full_name:            String,
  pub username:             String,
  pub status_kehadiran:     AttendanceStatus,
  /// Health condition when present, justification otherwise.
  pub reason:               String,
  pub scheduled_clock_time: Option<NaiveTime>,
  pub evidence_photo_url:   Option<String>,
  pub approval_status:      ApprovalStatus,
  pub feedback_admin:       Option<String>,
  pub created_at:           DateTime<Utc>,
  pub updated_at:           DateTime<Utc>,
}

/// Who is submitting. `email` is the identity key; the names are recorded for
/// the admin's review screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub email:     String,
  pub full_name: String,
  pub username:  String,
}

/// Input to [`crate::admission::AdmissionController::submit`].
#[derive(Debug, Clone)]
pub struct SubmitRequest {
  pub session_id:           Uuid,
  pub participant:          Participant,
  pub status:               AttendanceStatus,
  pub reason:               String,
  pub scheduled_clock_time: Option<NaiveTime>,
  pub evidence_photo_url:   Option<String>,
}

/// A successfully admitted submission plus the message to show the
/// participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admission {
  pub submission:       AttendanceSubmission,
  pub approval_message: String,
}

/// Answer to "has this participant already submitted for this session?".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionCheck {
  pub exists:     bool,
  pub submission: Option<AttendanceSubmission>,
}

impl From<Option<AttendanceSubmission>> for SubmissionCheck {
  fn from(submission: Option<AttendanceSubmission>) -> Self {
    Self { exists: submission.is_some(), submission }
  }
}
