//! Notification channel
//!
//! Process-wide, single-slot transient messages. A new message replaces
//! the current one; each message hides itself after the auto-hide delay
//! unless something newer has been shown in the meantime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

pub const DEFAULT_AUTO_HIDE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "OK",
            Severity::Error => "ERROR",
            Severity::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

struct Slot {
    tx: watch::Sender<Option<Notification>>,
    generation: AtomicU64,
}

/// Cloneable handle to the notification slot
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Slot>,
    auto_hide: Duration,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("current", &self.current())
            .field("auto_hide", &self.auto_hide)
            .finish()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_HIDE)
    }
}

impl Notifier {
    pub fn new(auto_hide: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            slot: Arc::new(Slot {
                tx,
                generation: AtomicU64::new(0),
            }),
            auto_hide,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.tx.subscribe()
    }

    pub fn current(&self) -> Option<Notification> {
        self.slot.tx.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.slot.tx.borrow().is_some()
    }

    /// Replace the slot and arm the auto-hide timer
    ///
    /// Outside a tokio runtime the message stays until closed or replaced.
    pub fn show(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        let generation = self.slot.generation.fetch_add(1, Ordering::SeqCst) + 1;
        match severity {
            Severity::Error => tracing::warn!(%message, "notify"),
            _ => tracing::debug!(?severity, %message, "notify"),
        }
        self.slot.tx.send_replace(Some(Notification { message, severity }));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let slot = Arc::clone(&self.slot);
            let delay = self.auto_hide;
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                slot.tx.send_if_modified(|current| {
                    // checked under the channel lock; a newer message stays
                    if slot.generation.load(Ordering::SeqCst) == generation && current.is_some() {
                        *current = None;
                        true
                    } else {
                        false
                    }
                });
            });
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Severity::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(Severity::Info, message);
    }

    /// Explicit close; disarms any pending auto-hide
    pub fn close(&self) {
        self.slot.generation.fetch_add(1, Ordering::SeqCst);
        self.slot.tx.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_hide_after_delay() {
        let notifier = Notifier::default();
        notifier.success("Empleado creado correctamente");
        assert_eq!(
            notifier.current(),
            Some(Notification {
                message: "Empleado creado correctamente".into(),
                severity: Severity::Success
            })
        );

        advance(2999).await;
        assert!(notifier.is_visible());
        advance(2).await;
        assert!(!notifier.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_write_wins_and_restarts_timer() {
        let notifier = Notifier::default();
        notifier.success("primero");
        advance(2000).await;
        notifier.error("segundo");

        assert_eq!(notifier.current().unwrap().message, "segundo");
        // the first timer fires at 3000 but must not clear the second message
        advance(1500).await;
        assert_eq!(notifier.current().unwrap().severity, Severity::Error);
        advance(1600).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_close() {
        let notifier = Notifier::new(Duration::from_secs(10));
        let mut rx = notifier.subscribe();
        notifier.info("hola");
        notifier.close();
        assert!(!notifier.is_visible());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn test_without_runtime_message_stays() {
        let notifier = Notifier::default();
        notifier.error("sin runtime");
        assert!(notifier.is_visible());
    }
}
