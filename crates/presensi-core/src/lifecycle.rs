//! Session lifecycle: creation, manual open/close, and the auto-close sweep.
//!
//! There is no in-process "current session". Every read that a client uses to
//! discover the open session first runs [`SessionManager::sweep`], so a session
//! past its auto-close time is closed no later than the next time anyone looks
//! at it. A background ticker may call the same sweep on a timer; it is an
//! addition, not a replacement.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  autoclose,
  clock::Clock,
  session::{Activation, AttendanceSession, NewSession, Transition},
  store::{AttendanceStore, SessionInsert},
  validate,
};

pub struct SessionManager<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for SessionManager<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), clock: Arc::clone(&self.clock) }
  }
}

impl<S: AttendanceStore> SessionManager<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }

  // ── Auto-close ────────────────────────────────────────────────────────────

  /// Close every active session whose auto-close time has passed. Returns the
  /// sessions this call closed.
  pub async fn sweep(&self) -> Result<Vec<AttendanceSession>> {
    let now = self.clock.now();
    let active = self.store.list_active_sessions().await.map_err(Error::store)?;

    if active.len() > 1 {
      warn!(count = active.len(), "more than one session is flagged active");
    }

    let mut closed = Vec::new();
    for session in active.iter().filter(|s| autoclose::should_close(s, now)) {
      let Some(scheduled) = session.auto_close_time else { continue };
      match self
        .store
        .auto_close(session.session_id, scheduled, now)
        .await
        .map_err(Error::store)?
      {
        Some(s) => {
          info!(
            session_id = %s.session_id,
            day_number = s.day_number,
            auto_close_time = %scheduled,
            "session auto-closed"
          );
          closed.push(s);
        }
        None => debug!(session_id = %session.session_id, "auto-close lost race; already closed"),
      }
    }
    Ok(closed)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All sessions by day number, after sweeping.
  pub async fn list(&self) -> Result<Vec<AttendanceSession>> {
    self.sweep().await?;
    self.store.list_sessions().await.map_err(Error::store)
  }

  pub async fn get(&self, id: Uuid) -> Result<AttendanceSession> {
    self.sweep().await?;
    self
      .store
      .get_session(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SessionNotFound(id))
  }

  /// The session currently accepting submissions, if any.
  pub async fn active(&self) -> Result<Option<AttendanceSession>> {
    self.sweep().await?;
    let active = self.store.list_active_sessions().await.map_err(Error::store)?;
    Ok(active.into_iter().next())
  }

  /// Active sessions that will auto-close within `window`.
  pub async fn closing_soon(&self, window: Duration) -> Result<Vec<AttendanceSession>> {
    self.sweep().await?;
    let now = self.clock.now();
    let active = self.store.list_active_sessions().await.map_err(Error::store)?;
    Ok(
      active
        .into_iter()
        .filter(|s| autoclose::upcoming_within(s, now, window))
        .collect(),
    )
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Create an inactive session for a day.
  pub async fn create(&self, input: NewSession, actor: &Actor) -> Result<AttendanceSession> {
    actor.require_admin()?;
    let now = self.clock.now();

    let day_title = validate::required("day_title", &input.day_title)?;
    if let Some(at) = input.auto_close_time {
      validate::future_instant(at, now)?;
    }

    let day_number = input.day_number;
    let session = AttendanceSession::new(NewSession { day_title, ..input }, &actor.email, now);

    match self.store.insert_session(session).await.map_err(Error::store)? {
      SessionInsert::Inserted(s) => {
        info!(session_id = %s.session_id, day_number, actor = %actor.email, "session created");
        Ok(s)
      }
      SessionInsert::DuplicateDay => Err(Error::DuplicateDay(day_number)),
    }
  }

  /// Open `id` for submissions, closing whichever session was open before.
  pub async fn activate(&self, id: Uuid, actor: &Actor) -> Result<Activation> {
    actor.require_admin()?;
    let now = self.clock.now();

    let activation = self
      .store
      .activate_exclusive(id, now)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SessionNotFound(id))?;

    if activation.changed {
      info!(
        session_id = %id,
        day_number = activation.session.day_number,
        deactivated = ?activation.deactivated,
        actor = %actor.email,
        "session activated"
      );
    }
    if let Some(at) = activation.cleared_auto_close {
      info!(session_id = %id, auto_close_time = %at, "cleared expired auto-close time");
    }
    Ok(activation)
  }

  /// Close `id`. Closing an already-closed session is not an error; the
  /// returned [`Transition::changed`] is `false`.
  pub async fn deactivate(&self, id: Uuid, actor: &Actor) -> Result<Transition> {
    actor.require_admin()?;
    let now = self.clock.now();

    let transition = self
      .store
      .deactivate(id, now)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SessionNotFound(id))?;

    if transition.changed {
      info!(session_id = %id, actor = %actor.email, "session deactivated");
    }
    Ok(transition)
  }

  /// Reschedule or clear the auto-close time of `id`.
  pub async fn set_auto_close(
    &self,
    id: Uuid,
    at: Option<DateTime<Utc>>,
    actor: &Actor,
  ) -> Result<AttendanceSession> {
    actor.require_admin()?;
    let now = self.clock.now();
    if let Some(at) = at {
      validate::future_instant(at, now)?;
    }

    let session = self
      .store
      .set_auto_close_time(id, at, now)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SessionNotFound(id))?;

    info!(session_id = %id, auto_close_time = ?at, actor = %actor.email, "auto-close rescheduled");
    Ok(session)
  }
}
