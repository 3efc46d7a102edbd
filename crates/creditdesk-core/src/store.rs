// ── Customer collection store ──
//
// Single source of truth for the customer list, loading/error status,
// and the current selection. State is published as whole snapshots
// through a `watch` channel; every mutation replaces the snapshot that
// subscribers receive.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::directory::CustomerDirectory;
use crate::model::Customer;

/// Fixed user-facing message for list failures. The underlying error
/// detail is discarded.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load customers data";

/// Snapshot of the store's observable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub customers: Vec<Customer>,
    pub selected_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreState {
    /// The currently selected customer, if the selection matches an
    /// entry in the collection.
    pub fn selected(&self) -> Option<&Customer> {
        let id = self.selected_id.as_deref()?;
        self.customers.iter().find(|c| c.id == id)
    }
}

struct StoreInner {
    directory: Arc<dyn CustomerDirectory>,
    state: watch::Sender<StoreState>,
}

/// Reactive store over the customer collection.
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone)]
pub struct CustomerStore {
    inner: Arc<StoreInner>,
}

impl CustomerStore {
    /// Create a store without fetching anything.
    ///
    /// Most callers want [`start`](Self::start); this constructor exists
    /// so tests can drive `refresh` explicitly.
    pub fn new(directory: Arc<dyn CustomerDirectory>) -> Self {
        let (state, _) = watch::channel(StoreState {
            loading: true,
            ..StoreState::default()
        });
        Self {
            inner: Arc::new(StoreInner { directory, state }),
        }
    }

    /// Create a store and spawn its initial refresh.
    ///
    /// The initial fetch runs exactly once. Must be called from within
    /// a tokio runtime.
    pub fn start(directory: Arc<dyn CustomerDirectory>) -> Self {
        let store = Self::new(directory);
        let task = store.clone();
        tokio::spawn(async move { task.refresh().await });
        store
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    /// The current state snapshot.
    pub fn snapshot(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    /// Re-fetch the customer collection.
    ///
    /// Sets `loading` and clears `error` up front; on resolution the
    /// collection is replaced wholesale (success) or `error` is set to
    /// [`LOAD_ERROR_MESSAGE`] (failure). Safe to call repeatedly:
    /// calls are not deduplicated, and the last one to resolve wins.
    pub async fn refresh(&self) {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.inner.directory.list_customers().await;

        self.inner.state.send_modify(|s| {
            match result {
                Ok(customers) => {
                    debug!(count = customers.len(), "customer list refreshed");
                    s.customers = customers;
                }
                Err(_) => {
                    // Detail is deliberately not surfaced or retained.
                    warn!("customer list refresh failed");
                    s.error = Some(LOAD_ERROR_MESSAGE.to_string());
                }
            }
            s.loading = false;
        });
    }

    /// Set the selection. The id is not validated against the
    /// collection; a stale id simply yields no `selected` entry.
    pub fn select(&self, id: impl Into<String>) {
        let id = id.into();
        self.inner
            .state
            .send_modify(|s| s.selected_id = Some(id));
    }

    /// The currently selected customer, cloned out of the snapshot.
    pub fn selected(&self) -> Option<Customer> {
        self.inner.state.borrow().selected().cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture::{DirectoryOp, InMemoryDirectory};

    fn fixture() -> Arc<InMemoryDirectory> {
        Arc::new(InMemoryDirectory::seeded())
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_replaces_the_collection_wholesale() {
        let directory = fixture();
        let store = CustomerStore::new(directory.clone());

        store.refresh().await;

        let state = store.snapshot();
        assert_eq!(state.customers.len(), 5);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_failure_sets_the_fixed_message_and_keeps_old_data() {
        let directory = fixture();
        let store = CustomerStore::new(directory.clone());
        store.refresh().await;

        directory.fail_on(DirectoryOp::List);
        store.refresh().await;

        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert!(!state.loading);
        // The previous collection is untouched on failure.
        assert_eq!(state.customers.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_refresh_clears_a_previous_error() {
        let directory = fixture();
        let store = CustomerStore::new(directory.clone());

        directory.fail_on(DirectoryOp::List);
        store.refresh().await;
        assert!(store.snapshot().error.is_some());

        directory.clear_failure(DirectoryOp::List);
        store.refresh().await;
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_publishes_a_loading_state_while_in_flight() {
        let directory = Arc::new(
            InMemoryDirectory::seeded().with_latency(std::time::Duration::from_millis(200)),
        );
        let store = CustomerStore::new(directory);

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        tokio::task::yield_now().await;
        assert!(store.snapshot().loading);
        assert_eq!(store.snapshot().error, None);

        task.await.unwrap();
        assert!(!store.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn start_runs_the_initial_refresh_exactly_once() {
        let directory = fixture();
        let store = CustomerStore::start(directory.clone());

        let mut rx = store.subscribe();
        while rx.borrow().loading || rx.borrow().customers.is_empty() {
            rx.changed().await.unwrap();
        }

        assert_eq!(directory.calls(DirectoryOp::List), 1);
        assert_eq!(store.snapshot().customers.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn select_does_not_validate_and_selected_derives() {
        let directory = fixture();
        let store = CustomerStore::new(directory);
        store.refresh().await;

        store.select("2");
        assert_eq!(store.selected().unwrap().name, "Globex");

        // Unknown ids are accepted; they just select nothing.
        store.select("does-not-exist");
        assert_eq!(store.snapshot().selected_id.as_deref(), Some("does-not-exist"));
        assert_eq!(store.selected(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_collection_is_distinct_from_loading_and_error() {
        let directory = Arc::new(InMemoryDirectory::new(Vec::new()));
        let store = CustomerStore::new(directory);
        store.refresh().await;

        let state = store.snapshot();
        assert!(state.customers.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }
}
