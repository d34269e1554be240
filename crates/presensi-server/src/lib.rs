//! HTTP server for Presensi.
//!
//! Mounts the [`presensi_api`] router under `/api` behind Basic auth, plus an
//! unauthenticated `/health` probe.

pub mod auth;
pub mod error;
pub mod ticker;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, middleware, routing::get};
use presensi_core::{Attendance, admission::AdmissionPolicy, store::AttendanceStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::{AccountConfig, AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// Plain "present" submissions skip the review queue.
  #[serde(default = "default_auto_approve")]
  pub auto_approve_present:  bool,
  /// Run a background auto-close sweep at this period. Unset means sessions
  /// are closed only when read or submitted to.
  #[serde(default)]
  pub auto_close_sweep_secs: Option<u64>,
  #[serde(default)]
  pub accounts:              Vec<AccountConfig>,
}

fn default_auto_approve() -> bool { true }

impl ServerConfig {
  pub fn admission_policy(&self) -> AdmissionPolicy {
    AdmissionPolicy { auto_approve_present: self.auto_approve_present }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
pub struct AppState<S> {
  pub app:  Arc<Attendance<S>>,
  pub auth: Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { app: Arc::clone(&self.app), auth: Arc::clone(&self.auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level axum [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AttendanceStore + 'static,
{
  let api = presensi_api::api_router(state.app)
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
