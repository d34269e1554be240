//! Periodic auto-close sweep.
//!
//! Reads and submissions already sweep before they look at a session; the
//! ticker only makes closure visible to clients that are not polling.

use std::{sync::Arc, time::Duration};

use presensi_core::{Attendance, store::AttendanceStore};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{info, warn};

/// Spawn a task that calls [`Attendance::sweep`] every `every`.
pub fn spawn_auto_close<S>(app: Arc<Attendance<S>>, every: Duration) -> JoinHandle<()>
where
  S: AttendanceStore + 'static,
{
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      interval.tick().await;
      match app.sweep().await {
        Ok(closed) if !closed.is_empty() => {
          info!(count = closed.len(), "auto-close sweep closed sessions");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "auto-close sweep failed"),
      }
    }
  })
}
