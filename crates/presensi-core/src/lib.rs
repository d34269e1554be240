//! Core types and coordination logic for the Presensi attendance engine.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::AttendanceStore`]; the managers in
//! [`lifecycle`], [`admission`] and [`approval`] are the only writers and are
//! generic over that trait.

pub mod actor;
pub mod admission;
pub mod approval;
pub mod autoclose;
pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod service;
pub mod session;
pub mod store;
pub mod submission;
pub mod validate;

pub use error::{Error, Result};
pub use service::Attendance;
