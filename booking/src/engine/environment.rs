//! Environment dependencies for the booking engine.

use crate::catalog::ServiceDirectory;
use slotbook_core::environment::Clock;
use std::sync::Arc;
use uuid::Uuid;

/// Outbound notification hook for transitions that affect a counterpart.
///
/// Delivery is fire-and-forget; the engine never fails a transition because
/// a notification could not be sent.
pub trait Notifier: Send + Sync {
    /// Notify a user about a booking development
    fn notify(&self, recipient: Uuid, message: String);
}

/// Production notifier that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, recipient: Uuid, message: String) {
        tracing::info!(%recipient, message, "notification");
    }
}

/// Notifier that records every message, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<(Uuid, String)>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far
    #[must_use]
    pub fn messages(&self) -> Vec<(Uuid, String)> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: Uuid, message: String) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((recipient, message));
        }
    }
}

/// Environment dependencies for the booking engine
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Read-side view of the service catalog
    pub services: Arc<dyn ServiceDirectory>,
    /// Outbound notification hook
    pub notifier: Arc<dyn Notifier>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        services: Arc<dyn ServiceDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            clock,
            services,
            notifier,
        }
    }
}
