//! All possible UI actions. Actions are the sole mechanism for state
//! mutation in the TUI.

use creditdesk_core::{SaveOutcome, StoreState};

/// Which of the two panes holds input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneId {
    #[default]
    Table,
    Detail,
}

impl PaneId {
    pub fn other(self) -> Self {
        match self {
            Self::Table => Self::Detail,
            Self::Detail => Self::Table,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    FocusNext,

    // ── Data events (from core watch channels) ────────────────────
    StoreChanged(StoreState),
    ToastChanged(Option<String>),

    // ── Collection ────────────────────────────────────────────────
    SelectCustomer(String),
    RequestRefresh,

    // ── Editing ───────────────────────────────────────────────────
    RequestSave,
    SaveCompleted(SaveOutcome),

    // ── Notifications ─────────────────────────────────────────────
    ShowToast(String),
}
