//! Input validation and normalisation shared by the managers and the API.

use chrono::{DateTime, NaiveTime, Utc};
use url::Url;
use validator::ValidateEmail as _;

use crate::{Error, Result};

/// Upper bound on free-text fields; longer input is rejected, not truncated.
pub const MAX_TEXT_LEN: usize = 2000;

/// Trim `value` and reject it if empty or oversized.
pub fn required(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(field, "must not be empty"));
  }
  if trimmed.chars().count() > MAX_TEXT_LEN {
    return Err(Error::validation(
      field,
      format!("must be at most {MAX_TEXT_LEN} characters"),
    ));
  }
  Ok(trimmed.to_owned())
}

/// Trim an optional value, mapping blank input to `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
}

/// Normalise an email address to trimmed lowercase and check its shape.
pub fn email(value: &str) -> Result<String> {
  let normalised = value.trim().to_lowercase();
  if normalised.validate_email() {
    Ok(normalised)
  } else {
    Err(Error::validation("user_email", format!("{value:?} is not an email address")))
  }
}

/// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`.
pub fn clock_time(value: &str) -> Result<NaiveTime> {
  let value = value.trim();
  NaiveTime::parse_from_str(value, "%H:%M")
    .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
    .map_err(|_| {
      Error::validation("scheduled_clock_time", format!("{value:?} is not a time of day (HH:MM)"))
    })
}

/// Evidence links must be absolute http(s) URLs with a host.
pub fn photo_url(value: &str) -> Result<String> {
  let raw = required("evidence_photo_url", value)?;
  let url = Url::parse(&raw)
    .map_err(|e| Error::validation("evidence_photo_url", format!("invalid URL: {e}")))?;
  if !matches!(url.scheme(), "http" | "https") {
    return Err(Error::validation("evidence_photo_url", "must be an http(s) URL"));
  }
  if url.host_str().is_none_or(str::is_empty) {
    return Err(Error::validation("evidence_photo_url", "must name a host"));
  }
  Ok(raw)
}

/// A scheduled instant must lie strictly after `now`.
pub fn future_instant(at: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
  if at > now {
    Ok(at)
  } else {
    Err(Error::InvalidSchedule(at))
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  #[test]
  fn required_trims_and_rejects_blank() {
    assert_eq!(required("reason", "  sick  ").unwrap(), "sick");
    assert!(matches!(
      required("reason", "   "),
      Err(Error::Validation { field: "reason", .. })
    ));
    assert!(required("reason", &"x".repeat(MAX_TEXT_LEN + 1)).is_err());
  }

  #[test]
  fn optional_maps_blank_to_none() {
    assert_eq!(optional(Some("  ")), None);
    assert_eq!(optional(None), None);
    assert_eq!(optional(Some(" ok ")).as_deref(), Some("ok"));
  }

  #[test]
  fn email_normalises() {
    assert_eq!(email(" Alice@X.com ").unwrap(), "alice@x.com");
    for bad in ["", "alice", "@x.com", "alice@.com", "alice@x..com", "a b@x.com", "a@b@x.com"] {
      assert!(email(bad).is_err(), "{bad:?} should be rejected");
    }
  }

  #[test]
  fn clock_time_formats() {
    assert_eq!(clock_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_eq!(clock_time("16:05:10").unwrap(), NaiveTime::from_hms_opt(16, 5, 10).unwrap());
    assert!(clock_time("25:00").is_err());
    assert!(clock_time("soon").is_err());
  }

  #[test]
  fn photo_url_scheme() {
    assert!(photo_url("https://cdn.example.com/p.jpg").is_ok());
    assert!(photo_url("HTTP://cdn.example.com/p.jpg").is_ok());
    assert!(photo_url("ftp://example.com/p.jpg").is_err());
    assert!(photo_url("http://").is_err());
    assert!(photo_url("https:///p.jpg").is_err());
    assert!(photo_url("cdn.example.com/p.jpg").is_err());
    assert!(photo_url("").is_err());
  }

  #[test]
  fn future_instant_is_strict() {
    let now = Utc::now();
    assert!(matches!(future_instant(now, now), Err(Error::InvalidSchedule(_))));
    assert!(future_instant(now - Duration::seconds(1), now).is_err());
    assert!(future_instant(now + Duration::milliseconds(1), now).is_ok());
  }
}
