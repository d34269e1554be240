//! [`SqliteStore`], the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use presensi_core::{
  session::{Activation, AttendanceSession, Transition},
  store::{AttendanceStore, DecideOutcome, SessionInsert, SubmissionInsert},
  submission::{ApprovalStatus, AttendanceSubmission},
};

use crate::{
  Error, Result,
  encode::{
    RawSession, RawSubmission, SESSION_COLUMNS, SUBMISSION_COLUMNS, encode_approval,
    decode_dt, encode_clock_time, encode_dt, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

/// `true` if `e` is a UNIQUE constraint (not primary key, not foreign key)
/// violation.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An attendance store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls are
/// serialised onto one connection thread, and multi-statement writes run in a
/// transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn select_session(&self, id: Uuid) -> Result<Option<AttendanceSession>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SESSION_COLUMNS} FROM attendance_sessions WHERE session_id = ?1"),
              rusqlite::params![id_str],
              RawSession::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSession::into_session).transpose()
  }

  /// Run a session SELECT whose only parameters are baked into `sql`.
  async fn select_sessions(&self, sql: String) -> Result<Vec<AttendanceSession>> {
    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawSession::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawSession::into_session).collect()
  }

  /// Run a submission SELECT taking a single text parameter.
  async fn select_submissions(
    &self,
    sql: String,
    param: String,
  ) -> Result<Vec<AttendanceSubmission>> {
    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![param], RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawSubmission::into_submission).collect()
  }
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = Error;

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn insert_session(&self, session: AttendanceSession) -> Result<SessionInsert> {
    let id_str          = encode_uuid(session.session_id);
    let day_number      = i64::from(session.day_number);
    let day_title       = session.day_title.clone();
    let is_active       = session.is_active;
    let start_time      = session.start_time.map(encode_dt);
    let end_time        = session.end_time.map(encode_dt);
    let auto_close_time = session.auto_close_time.map(encode_dt);
    let created_by      = session.created_by.clone();
    let created_at      = encode_dt(session.created_at);
    let updated_at      = encode_dt(session.updated_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO attendance_sessions (
             session_id, day_number, day_title, is_active, start_time,
             end_time, auto_close_time, created_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            day_number,
            day_title,
            is_active,
            start_time,
            end_time,
            auto_close_time,
            created_by,
            created_at,
            updated_at,
          ],
        );
        match res {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(if inserted {
      SessionInsert::Inserted(session)
    } else {
      SessionInsert::DuplicateDay
    })
  }

  async fn get_session(&self, id: Uuid) -> Result<Option<AttendanceSession>> {
    self.select_session(id).await
  }

  async fn list_sessions(&self) -> Result<Vec<AttendanceSession>> {
    self
      .select_sessions(format!(
        "SELECT {SESSION_COLUMNS} FROM attendance_sessions ORDER BY day_number ASC"
      ))
      .await
  }

  async fn list_active_sessions(&self) -> Result<Vec<AttendanceSession>> {
    self
      .select_sessions(format!(
        "SELECT {SESSION_COLUMNS} FROM attendance_sessions
         WHERE is_active = 1 ORDER BY day_number ASC"
      ))
      .await
  }

  async fn activate_exclusive(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<Activation>> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(now);

    let outcome: Option<(RawSession, Vec<String>, bool, Option<String>)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<(bool, Option<String>)> = tx
          .query_row(
            "SELECT is_active, auto_close_time FROM attendance_sessions WHERE session_id = ?1",
            rusqlite::params![id_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        // Unknown id: dropping `tx` rolls back, though nothing was written.
        let Some((already_active, auto_close_time)) = current else { return Ok(None) };

        // Encoded instants sort lexically, so string order is time order.
        let stale = auto_close_time.filter(|at| at.as_str() <= now_str.as_str());

        let deactivated: Vec<String> = {
          let mut stmt = tx.prepare(
            "SELECT session_id FROM attendance_sessions
             WHERE is_active = 1 AND session_id != ?1",
          )?;
          stmt
            .query_map(rusqlite::params![id_str], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.execute(
          "UPDATE attendance_sessions
           SET is_active = 0, end_time = ?2, updated_at = ?2
           WHERE is_active = 1 AND session_id != ?1",
          rusqlite::params![id_str, now_str],
        )?;

        if stale.is_some() {
          tx.execute(
            "UPDATE attendance_sessions
             SET auto_close_time = NULL, updated_at = ?2
             WHERE session_id = ?1",
            rusqlite::params![id_str, now_str],
          )?;
        }

        if !already_active {
          tx.execute(
            "UPDATE attendance_sessions
             SET is_active = 1, start_time = ?2, end_time = NULL, updated_at = ?2
             WHERE session_id = ?1",
            rusqlite::params![id_str, now_str],
          )?;
        }

        let raw = tx.query_row(
          &format!("SELECT {SESSION_COLUMNS} FROM attendance_sessions WHERE session_id = ?1"),
          rusqlite::params![id_str],
          RawSession::from_row,
        )?;

        tx.commit()?;
        let changed = !already_active || stale.is_some();
        Ok(Some((raw, deactivated, changed, stale)))
      })
      .await?;

    let Some((raw, deactivated, changed, stale)) = outcome else { return Ok(None) };
    Ok(Some(Activation {
      session: raw.into_session()?,
      deactivated: deactivated
        .iter()
        .map(|s| Uuid::parse_str(s))
        .collect::<std::result::Result<_, _>>()?,
      changed,
      cleared_auto_close: stale.as_deref().map(decode_dt).transpose()?,
    }))
  }

  async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<Transition>> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(now);

    let (changed, raw): (bool, Option<RawSession>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE attendance_sessions
           SET is_active = 0, end_time = ?2, updated_at = ?2
           WHERE session_id = ?1 AND is_active = 1",
          rusqlite::params![id_str, now_str],
        )? == 1;
        let raw = tx
          .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM attendance_sessions WHERE session_id = ?1"),
            rusqlite::params![id_str],
            RawSession::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok((changed, raw))
      })
      .await?;

    raw
      .map(|r| Ok(Transition { session: r.into_session()?, changed }))
      .transpose()
  }

  async fn auto_close(
    &self,
    id: Uuid,
    scheduled: DateTime<Utc>,
    now: DateTime<Utc>,
  ) -> Result<Option<AttendanceSession>> {
    let id_str        = encode_uuid(id);
    let scheduled_str = encode_dt(scheduled);
    let now_str       = encode_dt(now);

    let closed = self
      .conn
      .call(move |conn| {
        Ok(
          conn.execute(
            "UPDATE attendance_sessions
             SET is_active = 0, end_time = ?3, updated_at = ?3
             WHERE session_id = ?1 AND is_active = 1 AND auto_close_time = ?2",
            rusqlite::params![id_str, scheduled_str, now_str],
          )? == 1,
        )
      })
      .await?;

    if closed { self.select_session(id).await } else { Ok(None) }
  }

  async fn set_auto_close_time(
    &self,
    id: Uuid,
    at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
  ) -> Result<Option<AttendanceSession>> {
    let id_str  = encode_uuid(id);
    let at_str  = at.map(encode_dt);
    let now_str = encode_dt(now);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(
          conn.execute(
            "UPDATE attendance_sessions SET auto_close_time = ?2, updated_at = ?3
             WHERE session_id = ?1",
            rusqlite::params![id_str, at_str, now_str],
          )? == 1,
        )
      })
      .await?;

    if updated { self.select_session(id).await } else { Ok(None) }
  }

  // ── Submissions ───────────────────────────────────────────────────────────

  async fn insert_submission(&self, submission: AttendanceSubmission) -> Result<SubmissionInsert> {
    let id_str         = encode_uuid(submission.submission_id);
    let session_id_str = encode_uuid(submission.session_id);
    let user_email     = submission.user_email.clone();
    let full_name      = submission.full_name.clone();
    let username       = submission.username.clone();
    let status         = encode_status(submission.status_kehadiran);
    let reason         = submission.reason.clone();
    let clock_time     = submission.scheduled_clock_time.map(encode_clock_time);
    let photo_url      = submission.evidence_photo_url.clone();
    let approval       = encode_approval(submission.approval_status);
    let feedback       = submission.feedback_admin.clone();
    let created_at     = encode_dt(submission.created_at);
    let updated_at     = encode_dt(submission.updated_at);

    let existing: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO attendance_submissions (
             submission_id, session_id, user_email, full_name, username,
             status_kehadiran, reason, scheduled_clock_time, evidence_photo_url,
             approval_status, feedback_admin, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id_str,
            session_id_str,
            user_email,
            full_name,
            username,
            status,
            reason,
            clock_time,
            photo_url,
            approval,
            feedback,
            created_at,
            updated_at,
          ],
        );
        match res {
          Ok(_) => Ok(None),
          Err(e) if is_unique_violation(&e) => {
            let raw = conn.query_row(
              &format!(
                "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions
                 WHERE user_email = ?1 AND session_id = ?2"
              ),
              rusqlite::params![user_email, session_id_str],
              RawSubmission::from_row,
            )?;
            Ok(Some(raw))
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match existing {
      None => Ok(SubmissionInsert::Inserted(submission)),
      Some(raw) => Ok(SubmissionInsert::Duplicate(raw.into_submission()?)),
    }
  }

  async fn get_submission(&self, id: Uuid) -> Result<Option<AttendanceSubmission>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions WHERE submission_id = ?1"
              ),
              rusqlite::params![id_str],
              RawSubmission::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSubmission::into_submission).transpose()
  }

  async fn find_submission(
    &self,
    user_email: &str,
    session_id: Uuid,
  ) -> Result<Option<AttendanceSubmission>> {
    let email          = user_email.to_owned();
    let session_id_str = encode_uuid(session_id);
    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions
                 WHERE user_email = ?1 AND session_id = ?2"
              ),
              rusqlite::params![email, session_id_str],
              RawSubmission::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSubmission::into_submission).transpose()
  }

  async fn list_submissions_by_approval(
    &self,
    status: ApprovalStatus,
  ) -> Result<Vec<AttendanceSubmission>> {
    self
      .select_submissions(
        format!(
          "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions
           WHERE approval_status = ?1 ORDER BY created_at ASC, rowid ASC"
        ),
        encode_approval(status).to_owned(),
      )
      .await
  }

  async fn list_submissions_for_session(
    &self,
    session_id: Uuid,
  ) -> Result<Vec<AttendanceSubmission>> {
    self
      .select_submissions(
        format!(
          "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions
           WHERE session_id = ?1 ORDER BY created_at ASC, rowid ASC"
        ),
        encode_uuid(session_id),
      )
      .await
  }

  async fn list_submissions_for_user(&self, user_email: &str) -> Result<Vec<AttendanceSubmission>> {
    self
      .select_submissions(
        format!(
          "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions
           WHERE user_email = ?1 ORDER BY created_at DESC, rowid DESC"
        ),
        user_email.to_owned(),
      )
      .await
  }

  async fn decide_submission(
    &self,
    id: Uuid,
    status: ApprovalStatus,
    feedback: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<DecideOutcome> {
    let id_str     = encode_uuid(id);
    let status_str = encode_approval(status);
    let pending    = encode_approval(ApprovalStatus::Pending);
    let now_str    = encode_dt(now);

    let (changed, raw): (bool, Option<RawSubmission>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE attendance_submissions
           SET approval_status = ?2, feedback_admin = ?3, updated_at = ?4
           WHERE submission_id = ?1 AND approval_status = ?5",
          rusqlite::params![id_str, status_str, feedback, now_str, pending],
        )? == 1;
        let raw = tx
          .query_row(
            &format!(
              "SELECT {SUBMISSION_COLUMNS} FROM attendance_submissions WHERE submission_id = ?1"
            ),
            rusqlite::params![id_str],
            RawSubmission::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok((changed, raw))
      })
      .await?;

    Ok(match raw {
      None => DecideOutcome::NotFound,
      Some(raw) if changed => DecideOutcome::Decided(raw.into_submission()?),
      Some(raw) => DecideOutcome::AlreadyDecided(raw.into_submission()?),
    })
  }
}
