//! Core library for clinicdesk.
//!
//! Holds everything the admin console needs that is not terminal rendering:
//! - `auth`: persistent token storage and the `SessionStore`
//! - `api`: the `AdminApiClient` for the platform backend
//! - `directory`: the in-memory doctor directory and its fetch bookkeeping
//! - `notify`: transient notifications (toasts)
//! - `context`: the `AdminContext` handle tying the pieces together
//! - `config`: backend URL and remembered login details

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod directory;
pub mod models;
pub mod notify;

pub use api::{AdminApiClient, ApiError, FailureKind};
pub use auth::{FileStorage, MemoryStorage, SessionStore, TokenStorage, TokenWatch};
pub use config::Config;
pub use context::AdminContext;
pub use directory::{DoctorDirectory, FetchTicket};
pub use models::DoctorRecord;
pub use notify::{Notifier, Toast, ToastLevel, ToastQueue};
