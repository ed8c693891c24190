//! Notification surface collaborator.
//!
//! Best-effort by contract: delivery is permission-gated on the host
//! side and may silently do nothing. Nothing in the core ever depends on
//! a notification having been shown; in particular an achievement unlock
//! proceeds whether or not the notification fires.

/// Host-supplied notification sink.
pub trait Notifier {
    /// Show a notification. Infallible by design; implementations
    /// swallow delivery errors.
    fn notify(&self, title: &str, body: &str);
}

/// Discards all notifications (tests, headless hosts, permission denied).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}
