//! Admin review of submissions.
//!
//! A submission leaves `Pending` exactly once. There is no re-opening: a second
//! decision fails with [`Error::AlreadyDecided`] and writes nothing.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  clock::Clock,
  store::{AttendanceStore, DecideOutcome},
  submission::{ApprovalStatus, AttendanceSubmission, Decision},
  validate,
};

pub struct ApprovalWorkflow<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for ApprovalWorkflow<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), clock: Arc::clone(&self.clock) }
  }
}

impl<S: AttendanceStore> ApprovalWorkflow<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }

  /// Approve or reject a pending submission.
  pub async fn decide(
    &self,
    id: Uuid,
    decision: Decision,
    feedback: Option<String>,
    actor: &Actor,
  ) -> Result<AttendanceSubmission> {
    actor.require_admin()?;
    let feedback = validate::optional(feedback.as_deref());
    let now = self.clock.now();

    match self
      .store
      .decide_submission(id, decision.into(), feedback, now)
      .await
      .map_err(Error::store)?
    {
      DecideOutcome::Decided(submission) => {
        info!(
          submission_id = %id,
          decision = %submission.approval_status,
          actor = %actor.email,
          "submission decided"
        );
        Ok(submission)
      }
      DecideOutcome::AlreadyDecided(current) => {
        Err(Error::AlreadyDecided { current: Box::new(current) })
      }
      DecideOutcome::NotFound => Err(Error::SubmissionNotFound(id)),
    }
  }

  /// The review queue: every pending submission, oldest first.
  pub async fn list_pending(&self, actor: &Actor) -> Result<Vec<AttendanceSubmission>> {
    actor.require_admin()?;
    self
      .store
      .list_submissions_by_approval(ApprovalStatus::Pending)
      .await
      .map_err(Error::store)
  }

  /// All submissions for a session, oldest first.
  pub async fn list_for_session(
    &self,
    session_id: Uuid,
    actor: &Actor,
  ) -> Result<Vec<AttendanceSubmission>> {
    actor.require_admin()?;
    self
      .store
      .list_submissions_for_session(session_id)
      .await
      .map_err(Error::store)
  }
}
