//! Admission of attendance submissions.
//!
//! A submission is accepted only against a session that is active *at the
//! moment of submission*: the auto-close sweep runs again here, so a client
//! that polled before the deadline cannot slip a late submission in.
//!
//! Duplicates are checked twice. The lookup before insert gives a friendly
//! error for the common repeat-visit case; the store's uniqueness constraint
//! on `(user_email, session_id)` is what actually guarantees one row per
//! participant per session when requests race.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  autoclose,
  clock::Clock,
  lifecycle::SessionManager,
  store::{AttendanceStore, SubmissionInsert},
  submission::{
    Admission, ApprovalStatus, AttendanceStatus, AttendanceSubmission, Participant,
    SubmissionCheck, SubmitRequest,
  },
  validate,
};

pub const APPROVED_MESSAGE: &str = "Attendance recorded. Have a great day!";
pub const PENDING_MESSAGE: &str = "Your submission is awaiting admin review.";

/// Knobs for how new submissions start out.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionPolicy {
  /// Plain "present" submissions skip the review queue.
  pub auto_approve_present: bool,
}

impl Default for AdmissionPolicy {
  fn default() -> Self { Self { auto_approve_present: true } }
}

impl AdmissionPolicy {
  /// The approval state a fresh submission with `status` starts in.
  pub fn initial_approval(&self, status: AttendanceStatus) -> ApprovalStatus {
    if status == AttendanceStatus::Present && self.auto_approve_present {
      ApprovalStatus::Approved
    } else {
      ApprovalStatus::Pending
    }
  }
}

/// The message shown to a participant for a submission in `approval`.
pub fn approval_message(approval: ApprovalStatus) -> &'static str {
  match approval {
    ApprovalStatus::Approved => APPROVED_MESSAGE,
    ApprovalStatus::Pending | ApprovalStatus::Rejected => PENDING_MESSAGE,
  }
}

pub struct AdmissionController<S> {
  store:    Arc<S>,
  sessions: SessionManager<S>,
  clock:    Arc<dyn Clock>,
  policy:   AdmissionPolicy,
}

impl<S> Clone for AdmissionController<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      sessions: self.sessions.clone(),
      clock:    Arc::clone(&self.clock),
      policy:   self.policy,
    }
  }
}

impl<S: AttendanceStore> AdmissionController<S> {
  pub fn new(
    store: Arc<S>,
    sessions: SessionManager<S>,
    clock: Arc<dyn Clock>,
    policy: AdmissionPolicy,
  ) -> Self {
    Self { store, sessions, clock, policy }
  }

  pub fn policy(&self) -> AdmissionPolicy { self.policy }

  /// Validate and record one participant's attendance for a session.
  pub async fn submit(&self, request: SubmitRequest) -> Result<Admission> {
    let fields = ValidatedFields::from_request(&request)?;
    let session_id = request.session_id;

    // Re-evaluate auto-close now rather than trusting the client's last poll.
    let session = self.sessions.get(session_id).await?;
    let now = self.clock.now();
    if !autoclose::state_of(&session, now).accepts_submissions() {
      debug!(%session_id, user = %fields.participant.email, "rejected: session not active");
      return Err(Error::SessionNotActive(session_id));
    }

    if let Some(existing) = self
      .store
      .find_submission(&fields.participant.email, session_id)
      .await
      .map_err(Error::store)?
    {
      debug!(%session_id, user = %existing.user_email, "rejected: already submitted");
      return Err(Error::AlreadySubmitted { existing: Box::new(existing) });
    }

    let approval_status = self.policy.initial_approval(request.status);
    let submission = AttendanceSubmission {
      submission_id: Uuid::new_v4(),
      session_id,
      user_email: fields.participant.email,
      full_name: fields.participant.full_name,
      username: fields.participant.username,
      status_kehadiran: request.status,
      reason: fields.reason,
      scheduled_clock_time: request.scheduled_clock_time,
      evidence_photo_url: fields.evidence_photo_url,
      approval_status,
      feedback_admin: None,
      created_at: now,
      updated_at: now,
    };

    match self.store.insert_submission(submission).await.map_err(Error::store)? {
      SubmissionInsert::Inserted(submission) => {
        info!(
          submission_id = %submission.submission_id,
          %session_id,
          user = %submission.user_email,
          status = %submission.status_kehadiran,
          approval = %submission.approval_status,
          "attendance submitted"
        );
        Ok(Admission {
          approval_message: approval_message(submission.approval_status).to_owned(),
          submission,
        })
      }
      SubmissionInsert::Duplicate(existing) => {
        warn!(%session_id, user = %existing.user_email, "concurrent duplicate submission rejected by store");
        Err(Error::AlreadySubmitted { existing: Box::new(existing) })
      }
    }
  }

  /// Whether `user_email` has a submission for `session_id`, and if so which.
  pub async fn check(&self, user_email: &str, session_id: Uuid) -> Result<SubmissionCheck> {
    let email = validate::email(user_email)?;
    let found = self
      .store
      .find_submission(&email, session_id)
      .await
      .map_err(Error::store)?;
    Ok(found.into())
  }

  /// A participant's submissions across all sessions, newest first.
  pub async fn history(&self, user_email: &str) -> Result<Vec<AttendanceSubmission>> {
    let email = validate::email(user_email)?;
    self
      .store
      .list_submissions_for_user(&email)
      .await
      .map_err(Error::store)
  }
}

// ─── Field validation ────────────────────────────────────────────────────────

struct ValidatedFields {
  participant:        Participant,
  reason:             String,
  evidence_photo_url: Option<String>,
}

impl ValidatedFields {
  fn from_request(request: &SubmitRequest) -> Result<Self> {
    let participant = Participant {
      email:     validate::email(&request.participant.email)?,
      full_name: validate::required("full_name", &request.participant.full_name)?,
      username:  validate::required("username", &request.participant.username)?,
    };
    let reason = validate::required("reason", &request.reason)?;

    let status = request.status;
    match (status.requires_clock_time(), request.scheduled_clock_time) {
      (true, None) => {
        return Err(Error::validation(
          "scheduled_clock_time",
          format!("required when status is {status}"),
        ));
      }
      (false, Some(_)) => {
        return Err(Error::validation(
          "scheduled_clock_time",
          format!("must be omitted when status is {status}"),
        ));
      }
      _ => {}
    }

    let evidence_photo_url = match validate::optional(request.evidence_photo_url.as_deref()) {
      Some(url) => Some(validate::photo_url(&url)?),
      None if status.requires_evidence() => {
        return Err(Error::validation(
          "evidence_photo_url",
          format!("required when status is {status}"),
        ));
      }
      None => None,
    };

    Ok(Self { participant, reason, evidence_photo_url })
  }
}
