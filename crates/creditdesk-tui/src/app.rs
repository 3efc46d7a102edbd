//! Application core — event loop, pane focus, action dispatch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use creditdesk_core::{
    Customer, CustomerDirectory, CustomerEditor, CustomerStore, EditAction, Notifier,
};

use crate::action::{Action, PaneId};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::panes::{DetailPane, TablePane};
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    running: bool,
    focus: PaneId,
    table: TablePane,
    detail: DetailPane,
    store: CustomerStore,
    editor: CustomerEditor,
    notifier: Notifier,
    /// Latest toast text, mirrored from the notifier by the data bridge.
    toast: Option<String>,
    /// Action sender — panes can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(
        store: CustomerStore,
        directory: Arc<dyn CustomerDirectory>,
        notifier: Notifier,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        // The editor is seeded with the placeholder until a customer is
        // selected; the pane shares it via a clone.
        let editor = CustomerEditor::new(Customer::placeholder(), directory, store.clone());
        let detail = DetailPane::new(editor.clone());

        Self {
            running: true,
            focus: PaneId::default(),
            table: TablePane::new(),
            detail,
            store,
            editor,
            notifier,
            toast: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.table.set_focused(true);

        // Spawn the data bridge
        {
            let store = self.store.clone();
            let notifier = self.notifier.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::run_data_bridge(store, notifier, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the focused pane.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // An open edit buffer captures everything except Ctrl+C
        if self.focus == PaneId::Detail && self.detail.is_editing() {
            if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
                return Ok(Some(Action::Quit));
            }
            return self.detail.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Tab) => return Ok(Some(Action::FocusNext)),

            _ => {}
        }

        match self.focus {
            PaneId::Table => self.table.handle_key_event(key),
            PaneId::Detail => self.detail.handle_key_event(key),
        }
    }

    /// Process a single action — update app state and propagate to panes.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                debug!(width = *w, height = *h, "terminal resized");
            }

            Action::FocusNext => {
                self.focus = self.focus.other();
                self.table.set_focused(self.focus == PaneId::Table);
                self.detail.set_focused(self.focus == PaneId::Detail);
            }

            Action::StoreChanged(state) => {
                // Re-seed the editor whenever the record under edit
                // changes -- including a refresh that returned new data
                // for the same id, and deselection (placeholder).
                let target = state
                    .selected()
                    .cloned()
                    .unwrap_or_else(Customer::placeholder);
                if target != self.editor.original() {
                    debug!(customer = %target.id, "re-seeding editor");
                    self.editor.dispatch(EditAction::Reset(target));
                }
                self.forward_to_panes(action)?;
            }

            Action::ToastChanged(message) => {
                self.toast.clone_from(message);
            }

            Action::SelectCustomer(id) => {
                self.store.select(id.clone());
            }

            Action::RequestRefresh => {
                let store = self.store.clone();
                tokio::spawn(async move { store.refresh().await });
            }

            Action::RequestSave => {
                let editor = self.editor.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let outcome = editor.save().await;
                    let _ = tx.send(Action::SaveCompleted(outcome));
                });
            }

            Action::SaveCompleted(_) => {
                self.forward_to_panes(action)?;
            }

            Action::ShowToast(message) => {
                self.notifier.show(message.clone());
            }

            Action::Tick | Action::Render => {}
        }

        Ok(())
    }

    /// Send a data action to both panes; follow-ups go back on the queue.
    fn forward_to_panes(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.table.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        if let Some(follow_up) = self.detail.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [header, main, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " creditdesk — customer credit administration",
                theme::title_style(),
            ))),
            header,
        );

        let [table_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                .areas(main);

        self.table.render(frame, table_area);
        self.detail.render(frame, detail_area);

        Self::render_footer(frame, footer);

        if let Some(toast) = &self.toast {
            Self::render_toast(frame, toast);
        }
    }

    fn render_footer(frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("focus  ", theme::key_hint()),
            Span::styled("j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("save  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }

    /// Toast overlay in the top-right corner, above both panes.
    fn render_toast(frame: &mut Frame, toast: &str) {
        let area = frame.area();
        #[allow(clippy::cast_possible_truncation)]
        let width = (toast.chars().count() as u16 + 4).min(area.width);
        let rect = Rect::new(area.width.saturating_sub(width + 1), 1, width, 1);
        frame.render_widget(
            Paragraph::new(format!("  {toast}  ")).style(theme::toast()),
            rect,
        );
    }
}
