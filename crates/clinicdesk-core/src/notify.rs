//! Transient user notifications (toasts).

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

/// How long a toast stays visible.
const TOAST_TTL_SECS: i64 = 5;

/// Toasts kept at once; older ones are dropped first.
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(TOAST_TTL_SECS)
    }
}

/// Sink for user-visible notifications.
pub trait Notifier {
    fn error(&mut self, message: &str);
    fn info(&mut self, message: &str);
}

/// Bounded queue of recent toasts.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: ToastLevel, message: &str) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            level,
            message: message.to_string(),
            created_at: Utc::now(),
        });
    }

    /// Drop expired toasts.
    pub fn prune(&mut self) {
        self.prune_at(Utc::now());
    }

    pub fn prune_at(&mut self, now: DateTime<Utc>) {
        self.toasts.retain(|t| !t.is_expired_at(now));
    }

    /// Newest toast still alive.
    pub fn latest(&self) -> Option<&Toast> {
        let now = Utc::now();
        self.toasts.iter().rev().find(|t| !t.is_expired_at(now))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn error(&mut self, message: &str) {
        error!(text = %message, "Error toast");
        self.push(ToastLevel::Error, message);
    }

    fn info(&mut self, message: &str) {
        info!(text = %message, "Info toast");
        self.push(ToastLevel::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_toast_is_latest() {
        let mut queue = ToastQueue::new();
        queue.info("Logged in");
        queue.error("Invalid token");

        let latest = queue.latest().unwrap();
        assert_eq!(latest.level, ToastLevel::Error);
        assert_eq!(latest.message, "Invalid token");
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = ToastQueue::new();
        for i in 0..(MAX_TOASTS + 3) {
            queue.error(&format!("e{}", i));
        }
        assert_eq!(queue.len(), MAX_TOASTS);
        assert_eq!(queue.iter().next().unwrap().message, "e3");
    }

    #[test]
    fn test_prune_drops_expired() {
        let mut queue = ToastQueue::new();
        queue.error("old");
        let later = Utc::now() + Duration::seconds(TOAST_TTL_SECS + 1);
        queue.prune_at(later);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fresh_toast_survives_prune() {
        let mut queue = ToastQueue::new();
        queue.error("new");
        queue.prune();
        assert_eq!(queue.len(), 1);
    }
}
