//! HTTP Basic-auth middleware resolving credentials to an [`Actor`].
//!
//! The Basic username is the account email. A verified request continues with
//! the matching [`Actor`] in its extensions, which is where `presensi-api`
//! handlers look for it.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use presensi_core::actor::{Actor, Role};
use serde::Deserialize;

use crate::error::Error;

/// One login, as written in the `[[accounts]]` tables of `config.toml`.
#[derive(Deserialize, Clone)]
pub struct AccountConfig {
  pub email:         String,
  pub role:          Role,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Credentials accepted as valid for this server instance.
#[derive(Clone, Default)]
pub struct AuthConfig {
  accounts: Vec<AccountConfig>,
}

impl AuthConfig {
  pub fn new(accounts: Vec<AccountConfig>) -> Self {
    let accounts = accounts
      .into_iter()
      .map(|a| AccountConfig { email: a.email.trim().to_lowercase(), ..a })
      .collect();
    Self { accounts }
  }

  pub fn is_empty(&self) -> bool { self.accounts.is_empty() }

  fn find(&self, email: &str) -> Option<&AccountConfig> {
    let email = email.trim().to_lowercase();
    self.accounts.iter().find(|a| a.email == email)
  }
}

/// Verify credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Actor, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  let account = config.find(email).ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(Actor { email: account.email.clone(), role: account.role })
}

/// Middleware: reject with 401 unless the request carries valid credentials,
/// otherwise attach the resolved [`Actor`].
pub async fn require_auth(
  State(config): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let actor = match verify_auth(req.headers(), &config) {
    Ok(actor) => actor,
    Err(e) => {
      tracing::debug!(path = %req.uri().path(), "rejected unauthenticated request");
      return Err(e);
    }
  };
  req.extensions_mut().insert(actor);
  Ok(next.run(req).await)
}
