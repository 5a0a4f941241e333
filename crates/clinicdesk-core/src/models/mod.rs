//! Data models for the clinic backend.
//!
//! Doctor records are kept as opaque JSON; only the response envelopes
//! (`success` plus payload or `message`) have a fixed shape.

pub mod doctor;
pub mod response;

pub use doctor::DoctorRecord;
pub use response::{AllDoctorsResponse, LoginResponse};
