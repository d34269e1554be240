//! Extractor for the authenticated caller.

use axum::{extract::FromRequestParts, http::request::Parts};
use presensi_core::actor::Actor;

use crate::error::ApiError;

/// The [`Actor`] the embedding server attached to the request extensions.
/// Rejects with 401 when absent.
pub struct CurrentActor(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Actor>()
      .cloned()
      .map(CurrentActor)
      .ok_or(ApiError::Unauthorized)
  }
}
