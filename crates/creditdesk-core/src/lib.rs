//! Reactive data layer between `creditdesk-api` and the TUI.
//!
//! This crate owns the domain model and every piece of state the UI
//! renders:
//!
//! - **[`CustomerStore`]** — single source of truth for the customer
//!   collection, its loading/error status, and the current selection.
//!   Publishes [`StoreState`] snapshots over a `watch` channel.
//!
//! - **[`CustomerEditor`]** — per-customer edit state machine. Holds a
//!   draft of the mutable fields, tracks dirtiness, and performs a
//!   field-by-field save that tolerates partial failure.
//!
//! - **[`Notifier`]** — single-slot toast emitter with a self-clearing
//!   timer.
//!
//! - **[`CustomerDirectory`]** — the async service contract the store
//!   and editor talk to. Implemented by the HTTP
//!   [`DirectoryClient`](creditdesk_api::DirectoryClient) and by the
//!   seeded [`InMemoryDirectory`] fixture.

pub mod directory;
pub mod editor;
pub mod error;
pub mod fixture;
pub mod model;
pub mod notify;
pub mod store;

pub use directory::CustomerDirectory;
pub use editor::{CustomerEditor, Draft, EditAction, EditedField, SaveOutcome};
pub use error::CoreError;
pub use fixture::InMemoryDirectory;
pub use model::{Customer, Plan};
pub use notify::Notifier;
pub use store::{CustomerStore, StoreState};
