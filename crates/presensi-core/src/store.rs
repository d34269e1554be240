//! The `AttendanceStore` trait and the outcome types its writes report.
//!
//! The trait is implemented by storage backends (e.g. `presensi-store-sqlite`).
//! The managers in this crate are its only callers and hold all policy; a
//! backend's job is to make each method atomic and to enforce the two
//! uniqueness rules the managers rely on:
//!
//! - at most one session with `is_active = true`;
//! - at most one submission per `(user_email, session_id)`.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  session::{Activation, AttendanceSession, Transition},
  submission::{ApprovalStatus, AttendanceSubmission},
};

// ─── Write outcomes ──────────────────────────────────────────────────────────

/// Result of [`AttendanceStore::insert_session`].
#[derive(Debug, Clone)]
pub enum SessionInsert {
  Inserted(AttendanceSession),
  /// A session with the same `day_number` already exists.
  DuplicateDay,
}

/// Result of [`AttendanceStore::insert_submission`].
#[derive(Debug, Clone)]
pub enum SubmissionInsert {
  Inserted(AttendanceSubmission),
  /// The uniqueness constraint on `(user_email, session_id)` rejected the row;
  /// carries the submission already stored.
  Duplicate(AttendanceSubmission),
}

/// Result of [`AttendanceStore::decide_submission`].
#[derive(Debug, Clone)]
pub enum DecideOutcome {
  Decided(AttendanceSubmission),
  /// The submission had already left `Pending`; nothing was written.
  AlreadyDecided(AttendanceSubmission),
  NotFound,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable attendance store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Persist a new session unless its `day_number` is taken.
  fn insert_session(
    &self,
    session: AttendanceSession,
  ) -> impl Future<Output = Result<SessionInsert, Self::Error>> + Send + '_;

  /// Retrieve a session by id. Returns `None` if not found.
  fn get_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AttendanceSession>, Self::Error>> + Send + '_;

  /// All sessions ordered by `day_number`.
  fn list_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<AttendanceSession>, Self::Error>> + Send + '_;

  /// Sessions currently flagged active. Under a correct store this holds at
  /// most one element.
  fn list_active_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<AttendanceSession>, Self::Error>> + Send + '_;

  /// In one transaction, deactivate every other active session (stamping
  /// `end_time = now`) and activate `id` (`start_time = now`, `end_time`
  /// cleared). If `id` is already active it is left untouched. An
  /// `auto_close_time` on `id` at or before `now` is cleared in the same
  /// transaction and reported in [`Activation::cleared_auto_close`].
  ///
  /// Returns `None`, with nothing written, if `id` does not exist.
  fn activate_exclusive(
    &self,
    id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Activation>, Self::Error>> + Send + '_;

  /// Deactivate `id`, stamping `end_time = now` if it was active.
  /// Returns `None` if `id` does not exist.
  fn deactivate(
    &self,
    id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Transition>, Self::Error>> + Send + '_;

  /// Close `id` on behalf of the auto-close sweep, but only if it is still
  /// active and still scheduled for `scheduled`. Returns the closed session,
  /// or `None` if another writer got there first.
  fn auto_close(
    &self,
    id: Uuid,
    scheduled: DateTime<Utc>,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<AttendanceSession>, Self::Error>> + Send + '_;

  /// Replace (or clear) the auto-close time. Returns `None` if `id` does not
  /// exist.
  fn set_auto_close_time(
    &self,
    id: Uuid,
    at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<AttendanceSession>, Self::Error>> + Send + '_;

  // ── Submissions ───────────────────────────────────────────────────────

  /// Persist a submission. The `(user_email, session_id)` constraint is the
  /// authoritative duplicate guard.
  fn insert_submission(
    &self,
    submission: AttendanceSubmission,
  ) -> impl Future<Output = Result<SubmissionInsert, Self::Error>> + Send + '_;

  fn get_submission(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AttendanceSubmission>, Self::Error>> + Send + '_;

  /// The participant's submission for a session, if any.
  fn find_submission<'a>(
    &'a self,
    user_email: &'a str,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Option<AttendanceSubmission>, Self::Error>> + Send + 'a;

  /// Submissions in the given approval state, oldest first.
  fn list_submissions_by_approval(
    &self,
    status: ApprovalStatus,
  ) -> impl Future<Output = Result<Vec<AttendanceSubmission>, Self::Error>> + Send + '_;

  /// Every submission for a session, oldest first.
  fn list_submissions_for_session(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AttendanceSubmission>, Self::Error>> + Send + '_;

  /// Every submission by a participant, newest first.
  fn list_submissions_for_user<'a>(
    &'a self,
    user_email: &'a str,
  ) -> impl Future<Output = Result<Vec<AttendanceSubmission>, Self::Error>> + Send + 'a;

  /// Move a `Pending` submission to `status`. Must be a conditional write so
  /// that of two concurrent deciders exactly one wins.
  fn decide_submission(
    &self,
    id: Uuid,
    status: ApprovalStatus,
    feedback: Option<String>,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<DecideOutcome, Self::Error>> + Send + '_;
}
