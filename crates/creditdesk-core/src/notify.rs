// ── Toast notification emitter ──
//
// At most one message and one timer are ever live. `show` replaces the
// current message and restarts the clock; a generation counter lets a
// superseded timer recognize it is stale and leave the newer message
// alone.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

/// Default time a message stays visible.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

struct NotifierInner {
    duration: Duration,
    message: watch::Sender<Option<String>>,
    generation: AtomicU64,
}

/// Single-slot, self-clearing message emitter.
///
/// Cheaply cloneable; all clones share the same slot.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl Notifier {
    /// Create an emitter whose messages clear after `duration`.
    pub fn new(duration: Duration) -> Self {
        let (message, _) = watch::channel(None);
        Self {
            inner: Arc::new(NotifierInner {
                duration,
                message,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Display `text`, replacing any current message and restarting the
    /// clear timer. Must be called from within a tokio runtime.
    pub fn show(&self, text: impl Into<String>) {
        let text = text.into();
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.message.send_replace(Some(text));

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.duration).await;
            // A newer show() supersedes this timer.
            if inner.generation.load(Ordering::Relaxed) == generation {
                inner.message.send_replace(None);
            }
        });
    }

    /// The currently visible message, if any.
    pub fn current(&self) -> Option<String> {
        self.inner.message.borrow().clone()
    }

    /// Subscribe to message changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.message.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}
