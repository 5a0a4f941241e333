//! In-memory doctor directory.
//!
//! The directory is replaced wholesale by each applied successful fetch and
//! never touched by a failed one. Every fetch is tagged with a
//! [`FetchTicket`]; a successful response carrying a ticket at or below the
//! last applied (or invalidated) one is discarded, so overlapping fetches
//! cannot roll the directory back to older data.

use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::DoctorRecord;
use crate::notify::Notifier;

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct DoctorDirectory {
    doctors: Vec<DoctorRecord>,
    /// Last ticket handed out
    issued: u64,
    /// Tickets at or below this are stale
    floor: u64,
    in_flight: usize,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        &self.doctors
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    /// Whether any fetch has started but not completed.
    pub fn in_flight(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.in_flight += 1;
        debug!(seq = self.issued, "Doctor fetch started");
        FetchTicket(self.issued)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `Ok(true)` when the directory was replaced and `Ok(false)` when
    /// a stale success was dropped. Failures come back as `Err` with the
    /// directory untouched; only failures of a current ticket notify.
    pub fn complete<N: Notifier + ?Sized>(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<DoctorRecord>, ApiError>,
        notifier: &mut N,
    ) -> Result<bool, ApiError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Ok(doctors) => {
                if ticket.0 <= self.floor {
                    debug!(seq = ticket.0, floor = self.floor, "Discarding stale doctor list");
                    return Ok(false);
                }
                self.floor = ticket.0;
                self.doctors = doctors;
                debug!(seq = ticket.0, count = self.doctors.len(), "Doctor directory replaced");
                Ok(true)
            }
            Err(e) => {
                if ticket.0 <= self.floor {
                    debug!(seq = ticket.0, floor = self.floor, error = %e, "Ignoring stale doctor fetch failure");
                    return Err(e);
                }
                warn!(seq = ticket.0, error = %e, kind = ?e.failure_kind(), "Doctor fetch failed");
                notifier.error(&e.toast_message());
                Err(e)
            }
        }
    }

    /// Empty the directory and invalidate every fetch already started.
    pub fn clear(&mut self) {
        self.doctors.clear();
        self.floor = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastQueue;
    use serde_json::json;

    fn doctors(ids: &[i64]) -> Vec<DoctorRecord> {
        ids.iter().map(|id| DoctorRecord::new(json!({ "id": id }))).collect()
    }

    #[test]
    fn test_success_replaces_in_order() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let ticket = dir.begin_fetch();
        assert!(dir.in_flight());
        assert!(dir.complete(ticket, Ok(doctors(&[1, 2])), &mut toasts).unwrap());

        assert_eq!(dir.doctors(), doctors(&[1, 2]).as_slice());
        assert!(!dir.in_flight());
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_success_replaces_wholesale() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let t = dir.begin_fetch();
        dir.complete(t, Ok(doctors(&[1, 2, 3])), &mut toasts).unwrap();
        let t = dir.begin_fetch();
        dir.complete(t, Ok(doctors(&[9])), &mut toasts).unwrap();

        assert_eq!(dir.doctors(), doctors(&[9]).as_slice());
    }

    #[test]
    fn test_failure_leaves_directory_and_notifies() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let t = dir.begin_fetch();
        dir.complete(t, Ok(doctors(&[1])), &mut toasts).unwrap();

        let t = dir.begin_fetch();
        let result = dir.complete(
            t,
            Err(ApiError::Rejected("Invalid token".to_string())),
            &mut toasts,
        );

        assert!(matches!(result, Err(ApiError::Rejected(_))));
        assert_eq!(dir.doctors(), doctors(&[1]).as_slice());
        assert_eq!(toasts.latest().unwrap().message, "Invalid token");
        assert!(!dir.in_flight());
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let older = dir.begin_fetch();
        let newer = dir.begin_fetch();
        assert!(older < newer);

        assert!(dir.complete(newer, Ok(doctors(&[2])), &mut toasts).unwrap());
        assert!(!dir.complete(older, Ok(doctors(&[1])), &mut toasts).unwrap());

        assert_eq!(dir.doctors(), doctors(&[2]).as_slice());
        assert!(!dir.in_flight());
    }

    #[test]
    fn test_stale_failure_does_not_notify() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let older = dir.begin_fetch();
        let newer = dir.begin_fetch();
        assert!(dir.complete(newer, Ok(doctors(&[2])), &mut toasts).unwrap());

        let result = dir.complete(
            older,
            Err(ApiError::ServerError("boom".to_string())),
            &mut toasts,
        );

        assert!(matches!(result, Err(ApiError::ServerError(_))));
        assert_eq!(dir.doctors(), doctors(&[2]).as_slice());
        assert!(toasts.is_empty());
        assert!(!dir.in_flight());
    }

    #[test]
    fn test_failure_after_clear_does_not_notify() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let pending = dir.begin_fetch();
        dir.clear();
        let result = dir.complete(
            pending,
            Err(ApiError::Rejected("Invalid token".to_string())),
            &mut toasts,
        );

        assert!(result.is_err());
        assert!(toasts.is_empty());
        assert!(dir.is_empty());
    }

    #[test]
    fn test_out_of_order_older_first_still_applies_newer() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let older = dir.begin_fetch();
        let newer = dir.begin_fetch();
        assert!(dir.complete(older, Ok(doctors(&[1])), &mut toasts).unwrap());
        assert!(dir.complete(newer, Ok(doctors(&[2])), &mut toasts).unwrap());

        assert_eq!(dir.doctors(), doctors(&[2]).as_slice());
    }

    #[test]
    fn test_clear_invalidates_in_flight_fetches() {
        let mut dir = DoctorDirectory::new();
        let mut toasts = ToastQueue::new();

        let pending = dir.begin_fetch();
        dir.clear();
        assert!(!dir.complete(pending, Ok(doctors(&[1])), &mut toasts).unwrap());
        assert!(dir.is_empty());

        let next = dir.begin_fetch();
        assert!(dir.complete(next, Ok(doctors(&[3])), &mut toasts).unwrap());
        assert_eq!(dir.len(), 1);
    }
}
