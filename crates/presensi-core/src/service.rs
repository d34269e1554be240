//! [`Attendance`], the three managers wired over one store and one clock.
//!
//! This is the surface transports (HTTP, CLI, tests) program against. Each
//! method is one logical operation; all errors come back as [`crate::Error`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
  Result,
  actor::Actor,
  admission::{AdmissionController, AdmissionPolicy},
  approval::ApprovalWorkflow,
  clock::Clock,
  lifecycle::SessionManager,
  session::{Activation, AttendanceSession, NewSession, Transition},
  store::AttendanceStore,
  submission::{Admission, AttendanceSubmission, Decision, SubmissionCheck, SubmitRequest},
};

pub struct Attendance<S> {
  sessions:  SessionManager<S>,
  admission: AdmissionController<S>,
  approvals: ApprovalWorkflow<S>,
}

impl<S> Clone for Attendance<S> {
  fn clone(&self) -> Self {
    Self {
      sessions:  self.sessions.clone(),
      admission: self.admission.clone(),
      approvals: self.approvals.clone(),
    }
  }
}

impl<S: AttendanceStore> Attendance<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, policy: AdmissionPolicy) -> Self {
    let sessions = SessionManager::new(Arc::clone(&store), Arc::clone(&clock));
    let admission =
      AdmissionController::new(Arc::clone(&store), sessions.clone(), Arc::clone(&clock), policy);
    let approvals = ApprovalWorkflow::new(store, clock);
    Self { sessions, admission, approvals }
  }

  pub fn sessions(&self) -> &SessionManager<S> { &self.sessions }

  pub fn admission(&self) -> &AdmissionController<S> { &self.admission }

  pub fn approvals(&self) -> &ApprovalWorkflow<S> { &self.approvals }

  // ── Sessions ──────────────────────────────────────────────────────────────

  pub async fn list_sessions(&self) -> Result<Vec<AttendanceSession>> {
    self.sessions.list().await
  }

  pub async fn get_session(&self, id: Uuid) -> Result<AttendanceSession> {
    self.sessions.get(id).await
  }

  pub async fn active_session(&self) -> Result<Option<AttendanceSession>> {
    self.sessions.active().await
  }

  pub async fn closing_soon(&self, window: Duration) -> Result<Vec<AttendanceSession>> {
    self.sessions.closing_soon(window).await
  }

  pub async fn create_session(
    &self,
    input: NewSession,
    actor: &Actor,
  ) -> Result<AttendanceSession> {
    self.sessions.create(input, actor).await
  }

  pub async fn set_session_active(&self, id: Uuid, actor: &Actor) -> Result<Activation> {
    self.sessions.activate(id, actor).await
  }

  pub async fn set_session_inactive(&self, id: Uuid, actor: &Actor) -> Result<Transition> {
    self.sessions.deactivate(id, actor).await
  }

  pub async fn set_auto_close(
    &self,
    id: Uuid,
    at: Option<DateTime<Utc>>,
    actor: &Actor,
  ) -> Result<AttendanceSession> {
    self.sessions.set_auto_close(id, at, actor).await
  }

  /// Run the auto-close sweep on its own, as a background ticker does.
  pub async fn sweep(&self) -> Result<Vec<AttendanceSession>> { self.sessions.sweep().await }

  // ── Submissions ───────────────────────────────────────────────────────────

  pub async fn submit_attendance(&self, request: SubmitRequest) -> Result<Admission> {
    self.admission.submit(request).await
  }

  pub async fn check_submission(
    &self,
    user_email: &str,
    session_id: Uuid,
  ) -> Result<SubmissionCheck> {
    self.admission.check(user_email, session_id).await
  }

  pub async fn submission_history(&self, user_email: &str) -> Result<Vec<AttendanceSubmission>> {
    self.admission.history(user_email).await
  }

  // ── Approvals ─────────────────────────────────────────────────────────────

  pub async fn list_pending_approvals(&self, actor: &Actor) -> Result<Vec<AttendanceSubmission>> {
    self.approvals.list_pending(actor).await
  }

  pub async fn session_submissions(
    &self,
    session_id: Uuid,
    actor: &Actor,
  ) -> Result<Vec<AttendanceSubmission>> {
    self.approvals.list_for_session(session_id, actor).await
  }

  pub async fn decide_approval(
    &self,
    id: Uuid,
    decision: Decision,
    feedback: Option<String>,
    actor: &Actor,
  ) -> Result<AttendanceSubmission> {
    self.approvals.decide(id, decision, feedback, actor).await
  }
}
