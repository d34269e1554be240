//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed nine-digit
//! fraction, so they round-trip exactly and sort lexically in SQL. Enums are
//! stored as lowercase codes. UUIDs are stored as hyphenated lowercase strings.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use presensi_core::{
  session::AttendanceSession,
  submission::{ApprovalStatus, AttendanceStatus, AttendanceSubmission},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Nanos, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_clock_time(t: NaiveTime) -> String { t.format("%H:%M:%S%.f").to_string() }

pub fn decode_clock_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S%.f").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AttendanceStatus ────────────────────────────────────────────────────────

pub fn encode_status(s: AttendanceStatus) -> &'static str {
  match s {
    AttendanceStatus::Present => "present",
    AttendanceStatus::Absent => "absent",
    AttendanceStatus::ArrivingLate => "arriving_late",
    AttendanceStatus::LeavingEarly => "leaving_early",
  }
}

pub fn decode_status(s: &str) -> Result<AttendanceStatus> {
  match s {
    "present" => Ok(AttendanceStatus::Present),
    "absent" => Ok(AttendanceStatus::Absent),
    "arriving_late" => Ok(AttendanceStatus::ArrivingLate),
    "leaving_early" => Ok(AttendanceStatus::LeavingEarly),
    other => Err(Error::UnknownValue { column: "status_kehadiran", value: other.to_owned() }),
  }
}

// ─── ApprovalStatus ──────────────────────────────────────────────────────────

pub fn encode_approval(a: ApprovalStatus) -> &'static str { a.into() }

pub fn decode_approval(s: &str) -> Result<ApprovalStatus> {
  ApprovalStatus::from_str(s)
    .map_err(|_| Error::UnknownValue { column: "approval_status", value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const SESSION_COLUMNS: &str = "session_id, day_number, day_title, is_active, start_time,
  end_time, auto_close_time, created_by, created_at, updated_at";

/// Raw values read directly from an `attendance_sessions` row.
pub struct RawSession {
  pub session_id:      String,
  pub day_number:      i64,
  pub day_title:       String,
  pub is_active:       bool,
  pub start_time:      Option<String>,
  pub end_time:        Option<String>,
  pub auto_close_time: Option<String>,
  pub created_by:      String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawSession {
  /// Read a row selected with [`SESSION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id:      row.get(0)?,
      day_number:      row.get(1)?,
      day_title:       row.get(2)?,
      is_active:       row.get(3)?,
      start_time:      row.get(4)?,
      end_time:        row.get(5)?,
      auto_close_time: row.get(6)?,
      created_by:      row.get(7)?,
      created_at:      row.get(8)?,
      updated_at:      row.get(9)?,
    })
  }

  pub fn into_session(self) -> Result<AttendanceSession> {
    Ok(AttendanceSession {
      session_id:      decode_uuid(&self.session_id)?,
      day_number:      u32::try_from(self.day_number)
        .map_err(|_| Error::DayNumber(self.day_number))?,
      day_title:       self.day_title,
      is_active:       self.is_active,
      start_time:      decode_opt_dt(self.start_time)?,
      end_time:        decode_opt_dt(self.end_time)?,
      auto_close_time: decode_opt_dt(self.auto_close_time)?,
      created_by:      self.created_by,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

pub const SUBMISSION_COLUMNS: &str = "submission_id, session_id, user_email, full_name,
  username, status_kehadiran, reason, scheduled_clock_time, evidence_photo_url,
  approval_status, feedback_admin, created_at, updated_at";

/// Raw values read directly from an `attendance_submissions` row.
pub struct RawSubmission {
  pub submission_id:        String,
  pub session_id:           String,
  pub user_email:           String,
  pub full_name:            String,
  pub username:             String,
  pub status_kehadiran:     String,
  pub reason:               String,
  pub scheduled_clock_time: Option<String>,
  pub evidence_photo_url:   Option<String>,
  pub approval_status:      String,
  pub feedback_admin:       Option<String>,
  pub created_at:           String,
  pub updated_at:           String,
}

impl RawSubmission {
  /// Read a row selected with [`SUBMISSION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      submission_id:        row.get(0)?,
      session_id:           row.get(1)?,
      user_email:           row.get(2)?,
      full_name:            row.get(3)?,
      username:             row.get(4)?,
      status_kehadiran:     row.get(5)?,
      reason:               row.get(6)?,
      scheduled_clock_time: row.get(7)?,
      evidence_photo_url:   row.get(8)?,
      approval_status:      row.get(9)?,
      feedback_admin:       row.get(10)?,
      created_at:           row.get(11)?,
      updated_at:           row.get(12)?,
    })
  }

  pub fn into_submission(self) -> Result<AttendanceSubmission> {
    Ok(AttendanceSubmission {
      submission_id:        decode_uuid(&self.submission_id)?,
      session_id:           decode_uuid(&self.session_id)?,
      user_email:           self.user_email,
      full_name:            self.full_name,
      username:             self.username,
      status_kehadiran:     decode_status(&self.status_kehadiran)?,
      reason:               self.reason,
      scheduled_clock_time: self
        .scheduled_clock_time
        .as_deref()
        .map(decode_clock_time)
        .transpose()?,
      evidence_photo_url:   self.evidence_photo_url,
      approval_status:      decode_approval(&self.approval_status)?,
      feedback_admin:       self.feedback_admin,
      created_at:           decode_dt(&self.created_at)?,
      updated_at:           decode_dt(&self.updated_at)?,
    })
  }
}
