use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use token_transfer_core::{ClockPort, Notification, NotifierPort, PortError, TimestampMs};

use crate::SystemClockAdapter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    pub created_at_ms: TimestampMs,
    pub expires_at_ms: TimestampMs,
}

#[derive(Debug, Default)]
struct ToastState {
    next_id: u64,
    toasts: Vec<Toast>,
}

/// In-memory toast queue. Entries dismiss themselves after `ttl_ms`.
///
/// Clones share the same queue, so the controller can push into it while
/// the UI drains it.
#[derive(Debug, Clone)]
pub struct ToastNotifier<C = SystemClockAdapter> {
    clock: C,
    ttl_ms: u64,
    inner: Arc<Mutex<ToastState>>,
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new(5_000)
    }
}

impl ToastNotifier {
    pub fn new(ttl_ms: u64) -> Self {
        Self::with_clock(SystemClockAdapter, ttl_ms)
    }
}

impl<C: ClockPort> ToastNotifier<C> {
    pub fn with_clock(clock: C, ttl_ms: u64) -> Self {
        Self {
            clock,
            ttl_ms,
            inner: Arc::new(Mutex::new(ToastState::default())),
        }
    }

    /// Live toasts, oldest first. Expired entries are dropped.
    pub fn active(&self) -> Result<Vec<Toast>, PortError> {
        let now = self.clock.now_ms()?;
        let mut g = self.lock()?;
        g.toasts.retain(|t| t.expires_at_ms.0 > now);
        Ok(g.toasts.clone())
    }

    pub fn dismiss(&self, id: u64) -> Result<bool, PortError> {
        let mut g = self.lock()?;
        let before = g.toasts.len();
        g.toasts.retain(|t| t.id != id);
        Ok(g.toasts.len() != before)
    }

    /// Milliseconds until the next toast expires, for scheduling a repaint.
    pub fn next_expiry_in_ms(&self) -> Result<Option<u64>, PortError> {
        let now = self.clock.now_ms()?;
        let g = self.lock()?;
        Ok(g
            .toasts
            .iter()
            .map(|t| t.expires_at_ms.0.saturating_sub(now))
            .min())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ToastState>, PortError> {
        self.inner
            .lock()
            .map_err(|e| PortError::Transport(format!("toast lock poisoned: {e}")))
    }
}

impl<C: ClockPort> NotifierPort for ToastNotifier<C> {
    fn notify(&self, notification: Notification) -> Result<(), PortError> {
        if notification.is_error() {
            warn!(message = %notification.text(), "error notification");
        } else {
            info!(message = %notification.text(), "success notification");
        }

        let now = self.clock.now_ms()?;
        let mut g = self.lock()?;
        g.next_id = g.next_id.saturating_add(1);
        let id = g.next_id;
        g.toasts.push(Toast {
            id,
            notification,
            created_at_ms: TimestampMs(now),
            expires_at_ms: TimestampMs(now.saturating_add(self.ttl_ms)),
        });
        Ok(())
    }
}
