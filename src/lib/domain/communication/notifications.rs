//! Transient user notifications

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::debug;

/// How long a notification stays up
pub const DISMISS_AFTER: Duration = Duration::from_secs(4);

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// Something worked
    Success,

    /// Something went wrong
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub kind: NotificationKind,

    /// Text to display
    pub message: String,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Holds the notification currently on screen.
///
/// Showing a new notification replaces the old one and cancels its dismissal.
/// Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
}

impl Notifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, dismissing it after [`DISMISS_AFTER`]
    pub fn show(&self, kind: NotificationKind, message: &str) {
        debug!(%kind, text = message, "notification");

        let mut slot = self.lock();

        slot.generation += 1;
        slot.current = Some(Notification {
            kind,
            message: message.to_string(),
        });

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        // Outside a runtime the notification stays until replaced or dismissed.
        if let Ok(handle) = Handle::try_current() {
            let generation = slot.generation;
            let shared = Arc::clone(&self.slot);

            slot.timer = Some(handle.spawn(async move {
                tokio::time::sleep(DISMISS_AFTER).await;

                let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.generation == generation {
                    slot.current = None;
                    slot.timer = None;
                }
            }));
        }
    }

    /// Remove the current notification now
    pub fn dismiss(&self) {
        let mut slot = self.lock();

        slot.current = None;

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
    }

    /// The notification on screen, if any
    pub fn current(&self) -> Option<Notification> {
        self.lock().current.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notification_is_dismissed_after_four_seconds() {
        let notifier = Notifier::new();

        notifier.show(NotificationKind::Success, "Email sent successfully");

        tokio::time::sleep(Duration::from_millis(3900)).await;
        assert!(notifier.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_notification_outlives_older_timer() {
        let notifier = Notifier::new();

        notifier.show(NotificationKind::Error, "please enter a subject");
        tokio::time::sleep(Duration::from_secs(3)).await;

        notifier.show(NotificationKind::Success, "Email sent successfully");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(
            notifier.current(),
            Some(Notification {
                kind: NotificationKind::Success,
                message: "Email sent successfully".to_string(),
            })
        );

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test]
    async fn test_dismiss() {
        let notifier = Notifier::new();

        notifier.show(NotificationKind::Error, "oops");
        notifier.dismiss();

        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_show_outside_runtime_keeps_notification() {
        let notifier = Notifier::new();

        notifier.show(NotificationKind::Error, "invalid email format");

        assert_eq!(
            notifier.current().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }
}
