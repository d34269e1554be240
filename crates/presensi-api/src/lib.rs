//! JSON REST API for Presensi.
//!
//! Exposes an axum [`Router`] backed by an [`Attendance`] facade over any
//! [`presensi_core::store::AttendanceStore`]. Authentication is the caller's
//! responsibility: it must attach a [`presensi_core::actor::Actor`] to the
//! request extensions before the request reaches these handlers.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", presensi_api::api_router(app.clone()))
//! ```

pub mod actor;
pub mod approvals;
pub mod error;
pub mod sessions;
pub mod submissions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use presensi_core::{Attendance, store::AttendanceStore};

pub use actor::CurrentActor;
pub use error::ApiError;

/// Build a fully-materialised API router for `app`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(app: Arc<Attendance<S>>) -> Router<()>
where
  S: AttendanceStore + 'static,
{
  Router::new()
    // Sessions
    .route("/sessions", get(sessions::list::<S>).post(sessions::create::<S>))
    .route("/sessions/active", get(sessions::active::<S>))
    .route("/sessions/closing-soon", get(sessions::closing_soon::<S>))
    .route("/sessions/{id}", get(sessions::get_one::<S>))
    .route("/sessions/{id}/activate", post(sessions::activate::<S>))
    .route("/sessions/{id}/deactivate", post(sessions::deactivate::<S>))
    .route("/sessions/{id}/auto-close", put(sessions::set_auto_close::<S>))
    // Submissions
    .route(
      "/sessions/{id}/submissions",
      get(submissions::list_for_session::<S>).post(submissions::submit::<S>),
    )
    .route("/sessions/{id}/submissions/mine", get(submissions::mine::<S>))
    .route("/submissions/mine", get(submissions::history::<S>))
    // Approvals
    .route("/approvals/pending", get(approvals::pending::<S>))
    .route("/submissions/{id}/decision", post(approvals::decide::<S>))
    .with_state(app)
}
