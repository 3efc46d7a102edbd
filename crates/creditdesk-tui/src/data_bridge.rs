//! Data bridge — connects core watch channels to TUI actions.
//!
//! Runs as a background task: subscribes to the customer store and the
//! toast emitter, forwarding every change as an [`Action`] through the
//! TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use creditdesk_core::{CustomerStore, Notifier};

use crate::action::Action;

/// Spawn the data bridge connecting the store and notifier to the TUI.
///
/// Pushes the current snapshots first so the panes have data
/// immediately, then loops forwarding every change. Shuts down cleanly
/// on cancellation.
pub async fn run_data_bridge(
    store: CustomerStore,
    notifier: Notifier,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut store_rx = store.subscribe();
    let mut toast_rx = notifier.subscribe();

    // Initial snapshots so the first frame isn't empty
    let _ = action_tx.send(Action::StoreChanged(store.snapshot()));
    let _ = action_tx.send(Action::ToastChanged(notifier.current()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = store_rx.changed() => {
                let state = store_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::StoreChanged(state));
            }

            Ok(()) = toast_rx.changed() => {
                let message = toast_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::ToastChanged(message));
            }

            else => break,
        }
    }

    debug!("data bridge shut down");
}
