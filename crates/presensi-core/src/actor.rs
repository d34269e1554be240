//! The identity performing an operation.
//!
//! Authentication is the embedding server's job; by the time a request reaches
//! the managers it has been resolved to an [`Actor`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Participant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub email: String,
  pub role:  Role,
}

impl Actor {
  pub fn admin(email: impl Into<String>) -> Self {
    Self { email: email.into(), role: Role::Admin }
  }

  pub fn participant(email: impl Into<String>) -> Self {
    Self { email: email.into(), role: Role::Participant }
  }

  pub fn is_admin(&self) -> bool { self.role == Role::Admin }

  /// Fail with [`Error::Forbidden`] unless this actor is an admin.
  pub fn require_admin(&self) -> Result<()> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(Error::Forbidden(self.email.clone()))
    }
  }
}
