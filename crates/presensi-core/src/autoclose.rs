//! Auto-close evaluation.
//!
//! Pure predicates over a session and an instant. Nothing here writes; the
//! [`crate::lifecycle::SessionManager`] applies the resulting transitions.

use chrono::{DateTime, Duration, Utc};

use crate::session::{AttendanceSession, SessionState};

/// How far ahead, in seconds, closing-soon warnings look by default.
pub const DEFAULT_WARNING_WINDOW_SECS: i64 = 5 * 60;

pub fn default_warning_window() -> Duration { Duration::seconds(DEFAULT_WARNING_WINDOW_SECS) }

/// `true` iff the session is active, has an auto-close time, and that time has
/// been reached.
pub fn should_close(session: &AttendanceSession, now: DateTime<Utc>) -> bool {
  session.is_active && session.auto_close_time.is_some_and(|at| now >= at)
}

/// Same predicate as [`should_close`], named for UI warnings about sessions
/// that are still flagged active in storage but overdue.
pub fn is_overdue_but_still_active(session: &AttendanceSession, now: DateTime<Utc>) -> bool {
  should_close(session, now)
}

/// `true` if the session is active and will auto-close within `window` of
/// `now` but has not done so yet.
pub fn upcoming_within(
  session: &AttendanceSession,
  now: DateTime<Utc>,
  window: Duration,
) -> bool {
  session.is_active
    && session
      .auto_close_time
      .is_some_and(|at| now < at && at <= now + window)
}

/// Time left before an active session auto-closes. `None` if it has no
/// schedule, is inactive, or is already due.
pub fn time_remaining(session: &AttendanceSession, now: DateTime<Utc>) -> Option<Duration> {
  if !session.is_active {
    return None;
  }
  session
    .auto_close_time
    .filter(|at| *at > now)
    .map(|at| at - now)
}

/// Classify a session's lifecycle state at `now`.
pub fn state_of(session: &AttendanceSession, now: DateTime<Utc>) -> SessionState {
  if session.is_active {
    if should_close(session, now) {
      SessionState::ActiveOverdue
    } else {
      SessionState::Active
    }
  } else if session.end_time.is_some() {
    SessionState::Closed
  } else {
    SessionState::Inactive
  }
}
