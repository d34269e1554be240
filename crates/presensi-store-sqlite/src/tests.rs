//! Integration tests for `SqliteStore`, driven through the `Attendance`
//! facade against an in-memory database and a manual clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone as _, Utc};
use presensi_core::{
  Attendance, Error,
  actor::Actor,
  admission::{APPROVED_MESSAGE, AdmissionPolicy, PENDING_MESSAGE},
  clock::{Clock as _, ManualClock},
  session::NewSession,
  store::AttendanceStore as _,
  submission::{ApprovalStatus, AttendanceStatus, Decision, Participant, SubmitRequest},
};
use uuid::Uuid;

use crate::SqliteStore;

struct Harness {
  app:   Attendance<SqliteStore>,
  store: Arc<SqliteStore>,
  clock: ManualClock,
  admin: Actor,
}

impl Harness {
  fn clock_now(&self) -> DateTime<Utc> { self.clock.now() }
}

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 8, 17, 7, 0, 0).unwrap() }

async fn harness() -> Harness {
  let store = Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"));
  let clock = ManualClock::new(t0());
  let app = Attendance::new(Arc::clone(&store), Arc::new(clock.clone()), AdmissionPolicy::default());
  Harness { app, store, clock, admin: Actor::admin("admin@camp.id") }
}

fn new_session(day: u32, auto_close: Option<DateTime<Utc>>) -> NewSession {
  NewSession { day_number: day, day_title: format!("Day {day}"), auto_close_time: auto_close }
}

fn submit(session_id: Uuid, email: &str, status: AttendanceStatus) -> SubmitRequest {
  let needs_time = status.requires_clock_time();
  let needs_photo = status.requires_evidence();
  SubmitRequest {
    session_id,
    participant: Participant {
      email:     email.into(),
      full_name: "Budi Santoso".into(),
      username:  "budi".into(),
    },
    status,
    reason: "on my way".into(),
    scheduled_clock_time: needs_time.then(|| NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
    evidence_photo_url: needs_photo.then(|| "https://cdn.example.com/p.jpg".to_owned()),
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_session_starts_inactive() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();

  assert!(!s.is_active);
  assert!(s.start_time.is_none() && s.end_time.is_none());
  assert_eq!(s.created_by, "admin@camp.id");

  let fetched = h.app.get_session(s.session_id).await.unwrap();
  assert_eq!(fetched, s);
}

#[tokio::test]
async fn duplicate_day_number_is_rejected() {
  let h = harness().await;
  h.app.create_session(new_session(3, None), &h.admin).await.unwrap();

  let err = h.app.create_session(new_session(3, None), &h.admin).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateDay(3)), "{err:?}");
  assert_eq!(h.app.list_sessions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn auto_close_must_be_in_the_future() {
  let h = harness().await;

  let err = h.app.create_session(new_session(1, Some(t0())), &h.admin).await.unwrap_err();
  assert!(matches!(err, Error::InvalidSchedule(_)), "{err:?}");

  let past = t0() - Duration::minutes(1);
  let err = h.app.create_session(new_session(1, Some(past)), &h.admin).await.unwrap_err();
  assert!(matches!(err, Error::InvalidSchedule(_)), "{err:?}");

  let future = t0() + Duration::hours(2);
  let s = h.app.create_session(new_session(1, Some(future)), &h.admin).await.unwrap();
  assert_eq!(s.auto_close_time, Some(future));
}

#[tokio::test]
async fn sessions_list_by_day_number() {
  let h = harness().await;
  for day in [3, 1, 2] {
    h.app.create_session(new_session(day, None), &h.admin).await.unwrap();
  }
  let days: Vec<u32> = h.app.list_sessions().await.unwrap().iter().map(|s| s.day_number).collect();
  assert_eq!(days, vec![1, 2, 3]);
}

#[tokio::test]
async fn participants_cannot_manage_sessions() {
  let h = harness().await;
  let alice = Actor::participant("alice@x.com");

  let err = h.app.create_session(new_session(1, None), &alice).await.unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  let err = h.app.set_session_active(s.session_id, &alice).await.unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
  assert!(!h.app.get_session(s.session_id).await.unwrap().is_active);
}

// ─── Single active session ───────────────────────────────────────────────────

#[tokio::test]
async fn at_most_one_session_is_active() {
  let h = harness().await;
  let mut ids = Vec::new();
  for day in 1..=3 {
    ids.push(h.app.create_session(new_session(day, None), &h.admin).await.unwrap().session_id);
  }

  for &id in ids.iter().chain([ids[0], ids[2], ids[1]].iter()) {
    h.clock.advance(Duration::minutes(1));
    h.app.set_session_active(id, &h.admin).await.unwrap();

    let active = h.store.list_active_sessions().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].session_id, id);
  }
}

#[tokio::test]
async fn activation_closes_previous_session() {
  let h = harness().await;
  let a = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  let b = h.app.create_session(new_session(2, None), &h.admin).await.unwrap();

  h.app.set_session_active(a.session_id, &h.admin).await.unwrap();
  h.clock.advance(Duration::minutes(30));
  let switched_at = h.clock_now();
  let activation = h.app.set_session_active(b.session_id, &h.admin).await.unwrap();

  assert!(activation.changed);
  assert_eq!(activation.deactivated, vec![a.session_id]);
  assert_eq!(activation.session.start_time, Some(switched_at));

  let a = h.app.get_session(a.session_id).await.unwrap();
  assert!(!a.is_active);
  assert_eq!(a.end_time, Some(switched_at));
}

#[tokio::test]
async fn activating_the_active_session_is_a_noop() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();

  let first = h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  h.clock.advance(Duration::minutes(5));
  let again = h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  assert!(first.changed);
  assert!(!again.changed);
  assert!(again.deactivated.is_empty());
  assert_eq!(again.session.start_time, first.session.start_time);
}

#[tokio::test]
async fn deactivate_is_idempotent() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  let first = h.app.set_session_inactive(s.session_id, &h.admin).await.unwrap();
  h.clock.advance(Duration::minutes(5));
  let second = h.app.set_session_inactive(s.session_id, &h.admin).await.unwrap();

  assert!(first.changed);
  assert!(!second.changed);
  assert_eq!(second.session.end_time, first.session.end_time);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
  let h = harness().await;
  let id = Uuid::new_v4();

  assert!(matches!(h.app.get_session(id).await, Err(Error::SessionNotFound(x)) if x == id));
  assert!(matches!(
    h.app.set_session_active(id, &h.admin).await,
    Err(Error::SessionNotFound(_))
  ));
  assert!(matches!(
    h.app.set_session_inactive(id, &h.admin).await,
    Err(Error::SessionNotFound(_))
  ));
  assert!(h.store.list_active_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn reactivation_clears_end_time() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  h.app.set_session_inactive(s.session_id, &h.admin).await.unwrap();

  h.clock.advance(Duration::hours(1));
  let again = h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  assert!(again.changed);
  assert!(again.session.is_active);
  assert!(again.session.end_time.is_none());
  assert_eq!(again.session.start_time, Some(h.clock_now()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_activations_leave_one_session_active() {
  let h = harness().await;
  let app = Arc::new(h.app);
  let mut ids = Vec::new();
  for day in 1..=4 {
    ids.push(app.create_session(new_session(day, None), &h.admin).await.unwrap().session_id);
  }

  let tasks: Vec<_> = ids
    .iter()
    .chain(ids.iter())
    .map(|&id| {
      let app = Arc::clone(&app);
      let admin = h.admin.clone();
      tokio::spawn(async move { app.set_session_active(id, &admin).await })
    })
    .collect();
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let active = h.store.list_active_sessions().await.unwrap();
  assert_eq!(active.len(), 1);
  assert!(ids.contains(&active[0].session_id));
}

#[tokio::test]
async fn reactivating_after_auto_close_clears_expired_deadline() {
  let h = harness().await;
  let deadline = t0() + Duration::hours(1);
  let a = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();
  let b = h.app.create_session(new_session(2, None), &h.admin).await.unwrap();
  h.app.set_session_active(a.session_id, &h.admin).await.unwrap();

  h.clock.set(deadline + Duration::minutes(5));
  assert!(!h.app.list_sessions().await.unwrap()[0].is_active);
  h.app.set_session_active(b.session_id, &h.admin).await.unwrap();

  h.clock.advance(Duration::minutes(5));
  let again = h.app.set_session_active(a.session_id, &h.admin).await.unwrap();
  assert!(again.changed);
  assert_eq!(again.deactivated, vec![b.session_id]);
  assert_eq!(again.cleared_auto_close, Some(deadline));
  assert!(again.session.auto_close_time.is_none());

  h.clock.advance(Duration::minutes(1));
  let active = h.app.active_session().await.unwrap().expect("reopened session stays open");
  assert_eq!(active.session_id, a.session_id);
  h.app
    .submit_attendance(submit(a.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap();
}

#[tokio::test]
async fn activating_an_overdue_active_session_keeps_it_open() {
  let h = harness().await;
  let deadline = t0() + Duration::hours(1);
  let s = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();
  let first = h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  assert!(first.cleared_auto_close.is_none());

  h.clock.set(deadline + Duration::minutes(1));
  let again = h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  assert!(again.changed);
  assert_eq!(again.cleared_auto_close, Some(deadline));
  assert_eq!(again.session.start_time, first.session.start_time);

  assert!(h.app.sweep().await.unwrap().is_empty());
  assert!(h.app.active_session().await.unwrap().is_some());
}

// ─── Auto-close ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_closes_at_deadline_on_next_read() {
  let h = harness().await;
  let deadline = t0() + Duration::hours(1);
  let s = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  h.clock.set(deadline - Duration::seconds(1));
  assert!(h.app.active_session().await.unwrap().is_some());

  h.clock.set(deadline);
  let listed = h.app.list_sessions().await.unwrap();
  assert!(!listed[0].is_active);
  assert_eq!(listed[0].end_time, Some(deadline));
  assert!(h.app.active_session().await.unwrap().is_none());
}

#[tokio::test]
async fn sweep_reports_what_it_closed() {
  let h = harness().await;
  let deadline = t0() + Duration::minutes(10);
  let s = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  assert!(h.app.sweep().await.unwrap().is_empty());

  h.clock.set(deadline + Duration::minutes(1));
  let closed = h.app.sweep().await.unwrap();
  assert_eq!(closed.len(), 1);
  assert_eq!(closed[0].session_id, s.session_id);
  assert!(h.app.sweep().await.unwrap().is_empty());
}

#[tokio::test]
async fn stale_schedule_does_not_close_rescheduled_session() {
  let h = harness().await;
  let first = t0() + Duration::minutes(10);
  let s = h.app.create_session(new_session(1, Some(first)), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  let later = t0() + Duration::hours(1);
  h.app.set_auto_close(s.session_id, Some(later), &h.admin).await.unwrap();

  let closed = h.store.auto_close(s.session_id, first, first).await.unwrap();
  assert!(closed.is_none());
  assert!(h.app.get_session(s.session_id).await.unwrap().is_active);
}

#[tokio::test]
async fn set_auto_close_validates_and_clears() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();

  let err = h
    .app
    .set_auto_close(s.session_id, Some(t0()), &h.admin)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidSchedule(_)));

  let at = t0() + Duration::minutes(45);
  let updated = h.app.set_auto_close(s.session_id, Some(at), &h.admin).await.unwrap();
  assert_eq!(updated.auto_close_time, Some(at));

  let cleared = h.app.set_auto_close(s.session_id, None, &h.admin).await.unwrap();
  assert!(cleared.auto_close_time.is_none());

  let err = h.app.set_auto_close(Uuid::new_v4(), None, &h.admin).await.unwrap_err();
  assert!(matches!(err, Error::SessionNotFound(_)));
}

#[tokio::test]
async fn closing_soon_lists_sessions_inside_window() {
  let h = harness().await;
  let deadline = t0() + Duration::minutes(4);
  let s = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();

  assert!(h.app.closing_soon(Duration::minutes(5)).await.unwrap().is_empty());

  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  assert!(h.app.closing_soon(Duration::minutes(3)).await.unwrap().is_empty());
  let soon = h.app.closing_soon(Duration::minutes(5)).await.unwrap();
  assert_eq!(soon.len(), 1);
}

// ─── Submissions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn present_is_auto_approved() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  let admission = h
    .app
    .submit_attendance(submit(s.session_id, "Alice@X.com", AttendanceStatus::Present))
    .await
    .unwrap();

  assert_eq!(admission.submission.approval_status, ApprovalStatus::Approved);
  assert_eq!(admission.submission.user_email, "alice@x.com");
  assert_eq!(admission.approval_message, APPROVED_MESSAGE);

  let check = h.app.check_submission("alice@x.com", s.session_id).await.unwrap();
  assert!(check.exists);
  assert_eq!(check.submission, Some(admission.submission));
}

#[tokio::test]
async fn policy_can_queue_present_for_review() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let clock = Arc::new(ManualClock::new(t0()));
  let app = Attendance::new(store, clock, AdmissionPolicy { auto_approve_present: false });
  let admin = Actor::admin("admin@camp.id");

  let s = app.create_session(new_session(1, None), &admin).await.unwrap();
  app.set_session_active(s.session_id, &admin).await.unwrap();
  let admission = app
    .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap();
  assert_eq!(admission.submission.approval_status, ApprovalStatus::Pending);
  assert_eq!(admission.approval_message, PENDING_MESSAGE);
}

#[tokio::test]
async fn second_submission_is_rejected_with_existing() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  let first = h
    .app
    .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap();
  let err = h
    .app
    .submit_attendance(submit(s.session_id, "ALICE@x.com", AttendanceStatus::Absent))
    .await
    .unwrap_err();

  match err {
    Error::AlreadySubmitted { existing } => assert_eq!(*existing, first.submission),
    other => panic!("expected AlreadySubmitted, got {other:?}"),
  }
}

#[tokio::test]
async fn concurrent_duplicates_store_one_row() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  let (a, b) = tokio::join!(
    h.app.submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present)),
    h.app.submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present)),
  );

  let oks = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
  assert_eq!(oks, 1);
  for r in [a, b] {
    if let Err(e) = r {
      assert!(matches!(e, Error::AlreadySubmitted { .. }), "{e:?}");
    }
  }
  assert_eq!(h.store.list_submissions_for_session(s.session_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn store_constraint_reports_duplicate() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  let first = h
    .app
    .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap()
    .submission;

  let mut copy = first.clone();
  copy.submission_id = Uuid::new_v4();
  match h.store.insert_submission(copy).await.unwrap() {
    presensi_core::store::SubmissionInsert::Duplicate(existing) => assert_eq!(existing, first),
    other => panic!("expected duplicate, got {other:?}"),
  }
}

#[tokio::test]
async fn submissions_rejected_for_inactive_or_missing_session() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();

  let err = h
    .app
    .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SessionNotActive(_)), "{err:?}");

  let err = h
    .app
    .submit_attendance(submit(Uuid::new_v4(), "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SessionNotFound(_)), "{err:?}");
}

#[tokio::test]
async fn submission_after_deadline_is_rejected_without_prior_poll() {
  let h = harness().await;
  let deadline = t0() + Duration::minutes(30);
  let s = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  h.clock.set(deadline);
  let err = h
    .app
    .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SessionNotActive(_)), "{err:?}");

  let closed = h.store.get_session(s.session_id).await.unwrap().unwrap();
  assert!(!closed.is_active);
  assert_eq!(closed.end_time, Some(deadline));
}

#[tokio::test]
async fn invalid_fields_write_nothing() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  let mut req = submit(s.session_id, "alice@x.com", AttendanceStatus::ArrivingLate);
  req.scheduled_clock_time = None;
  let err = h.app.submit_attendance(req).await.unwrap_err();
  assert!(matches!(err, Error::Validation { field: "scheduled_clock_time", .. }), "{err:?}");

  assert!(h.store.list_submissions_for_session(s.session_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_is_newest_first() {
  let h = harness().await;
  let mut sessions = Vec::new();
  for day in 1..=2 {
    let s = h.app.create_session(new_session(day, None), &h.admin).await.unwrap();
    h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
    h
      .app
      .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Present))
      .await
      .unwrap();
    sessions.push(s.session_id);
    h.clock.advance(Duration::days(1));
  }

  let history = h.app.submission_history("alice@x.com").await.unwrap();
  let order: Vec<Uuid> = history.iter().map(|s| s.session_id).collect();
  assert_eq!(order, vec![sessions[1], sessions[0]]);
  assert!(h.app.submission_history("bob@x.com").await.unwrap().is_empty());
}

// ─── Approvals ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn decisions_are_final() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();
  let pending = h
    .app
    .submit_attendance(submit(s.session_id, "alice@x.com", AttendanceStatus::Absent))
    .await
    .unwrap()
    .submission;
  assert_eq!(pending.approval_status, ApprovalStatus::Pending);

  h.clock.advance(Duration::minutes(2));
  let approved = h
    .app
    .decide_approval(pending.submission_id, Decision::Approved, Some(" get well ".into()), &h.admin)
    .await
    .unwrap();
  assert_eq!(approved.approval_status, ApprovalStatus::Approved);
  assert_eq!(approved.feedback_admin.as_deref(), Some("get well"));
  assert_eq!(approved.updated_at, h.clock_now());

  let err = h
    .app
    .decide_approval(pending.submission_id, Decision::Rejected, Some("no".into()), &h.admin)
    .await
    .unwrap_err();
  match err {
    Error::AlreadyDecided { current } => {
      assert_eq!(current.approval_status, ApprovalStatus::Approved);
      assert_eq!(current.feedback_admin.as_deref(), Some("get well"));
    }
    other => panic!("expected AlreadyDecided, got {other:?}"),
  }

  let stored = h.store.get_submission(pending.submission_id).await.unwrap().unwrap();
  assert_eq!(stored, approved);
}

#[tokio::test]
async fn deciding_unknown_submission_is_not_found() {
  let h = harness().await;
  let err = h
    .app
    .decide_approval(Uuid::new_v4(), Decision::Rejected, None, &h.admin)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubmissionNotFound(_)));
}

#[tokio::test]
async fn pending_queue_is_oldest_first_and_admin_only() {
  let h = harness().await;
  let s = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  for email in ["c@x.com", "a@x.com", "b@x.com"] {
    h
      .app
      .submit_attendance(submit(s.session_id, email, AttendanceStatus::LeavingEarly))
      .await
      .unwrap();
  }
  h
    .app
    .submit_attendance(submit(s.session_id, "d@x.com", AttendanceStatus::Present))
    .await
    .unwrap();

  let queue = h.app.list_pending_approvals(&h.admin).await.unwrap();
  let emails: Vec<&str> = queue.iter().map(|s| s.user_email.as_str()).collect();
  assert_eq!(emails, vec!["c@x.com", "a@x.com", "b@x.com"]);

  let all = h.app.session_submissions(s.session_id, &h.admin).await.unwrap();
  assert_eq!(all.len(), 4);

  let alice = Actor::participant("a@x.com");
  assert!(matches!(h.app.list_pending_approvals(&alice).await, Err(Error::Forbidden(_))));
  assert!(matches!(
    h.app.session_submissions(s.session_id, &alice).await,
    Err(Error::Forbidden(_))
  ));
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_day_switch_then_submit() {
  let h = harness().await;
  let day1 = h.app.create_session(new_session(1, None), &h.admin).await.unwrap();
  let day2 = h.app.create_session(new_session(2, None), &h.admin).await.unwrap();

  h.app.set_session_active(day1.session_id, &h.admin).await.unwrap();
  h.clock.advance(Duration::hours(8));
  h.app.set_session_active(day2.session_id, &h.admin).await.unwrap();

  let err = h
    .app
    .submit_attendance(submit(day1.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SessionNotActive(_)));

  let active = h.app.active_session().await.unwrap().unwrap();
  assert_eq!(active.session_id, day2.session_id);
  h
    .app
    .submit_attendance(submit(active.session_id, "alice@x.com", AttendanceStatus::Present))
    .await
    .unwrap();
}

#[tokio::test]
async fn scenario_late_arrival_reviewed_by_admin() {
  let h = harness().await;
  let deadline = t0() + Duration::hours(2);
  let s = h.app.create_session(new_session(1, Some(deadline)), &h.admin).await.unwrap();
  h.app.set_session_active(s.session_id, &h.admin).await.unwrap();

  h.clock.advance(Duration::minutes(20));
  let admission = h
    .app
    .submit_attendance(submit(s.session_id, "budi@x.com", AttendanceStatus::ArrivingLate))
    .await
    .unwrap();
  assert_eq!(admission.approval_message, PENDING_MESSAGE);
  assert_eq!(
    admission.submission.scheduled_clock_time,
    NaiveTime::from_hms_opt(9, 30, 0)
  );

  let queue = h.app.list_pending_approvals(&h.admin).await.unwrap();
  assert_eq!(queue.len(), 1);
  h
    .app
    .decide_approval(queue[0].submission_id, Decision::Rejected, Some("no proof".into()), &h.admin)
    .await
    .unwrap();

  assert!(h.app.list_pending_approvals(&h.admin).await.unwrap().is_empty());
  let check = h.app.check_submission("budi@x.com", s.session_id).await.unwrap();
  assert_eq!(check.submission.unwrap().approval_status, ApprovalStatus::Rejected);
}

#[tokio::test]
async fn scenario_store_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("presensi-test-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("presensi.db");
  let admin = Actor::admin("admin@camp.id");

  let id = {
    let store = Arc::new(SqliteStore::open(&path).await.unwrap());
    let app = Attendance::new(store, Arc::new(ManualClock::new(t0())), AdmissionPolicy::default());
    let s = app.create_session(new_session(1, None), &admin).await.unwrap();
    app.set_session_active(s.session_id, &admin).await.unwrap();
    s.session_id
  };

  let store = SqliteStore::open(&path).await.unwrap();
  let active = store.list_active_sessions().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].session_id, id);

  drop(store);
  let _ = std::fs::remove_dir_all(&dir);
}
