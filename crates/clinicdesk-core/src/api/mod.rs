//! REST API client module for the clinic platform backend.
//!
//! This module provides the `AdminApiClient` for the admin endpoints
//! (login and the doctor directory).
//!
//! The backend authenticates admin calls with the raw token sent in the
//! `atoken` request header, not as a bearer token.

pub mod client;
pub mod error;

pub use client::{AdminApiClient, TOKEN_HEADER};
pub use error::{ApiError, FailureKind};
