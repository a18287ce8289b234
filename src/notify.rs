use chrono::Local;
use std::time::{Duration, Instant};
use tracing::info;

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub stamp: String,
    shown_at: Instant,
}

impl Toast {
    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_TTL
    }
}

/// Transient confirmations. Toasts stack and each one expires on its own.
#[derive(Debug, Default)]
pub struct Notifier {
    toasts: Vec<Toast>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notify_at(message, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        info!(message = %message, "notification");
        self.toasts.push(Toast {
            message,
            stamp: Local::now().format("%H:%M:%S").to_string(),
            shown_at: now,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.expired(now));
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_lives_three_seconds() {
        let start = Instant::now();
        let mut notifier = Notifier::new();
        notifier.notify_at("Task added successfully", start);

        notifier.prune(start + Duration::from_millis(2999));
        assert_eq!(notifier.active().len(), 1);

        notifier.prune(start + TOAST_TTL);
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn concurrent_toasts_stack_and_expire_independently() {
        let start = Instant::now();
        let mut notifier = Notifier::new();
        notifier.notify_at("first", start);
        notifier.notify_at("second", start + Duration::from_secs(2));
        assert_eq!(notifier.active().len(), 2);

        notifier.prune(start + Duration::from_secs(4));
        let left: Vec<_> = notifier.active().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(left, vec!["second"]);
    }
}
