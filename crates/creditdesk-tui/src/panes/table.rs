//! Customer table pane — renders the collection and drives selection.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use creditdesk_core::StoreState;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// What the pane shows, in priority order: loading beats error beats
/// empty beats the populated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Error(String),
    Empty,
    Populated,
}

impl ListPhase {
    pub fn of(state: &StoreState) -> Self {
        if state.loading {
            Self::Loading
        } else if let Some(error) = &state.error {
            Self::Error(error.clone())
        } else if state.customers.is_empty() {
            Self::Empty
        } else {
            Self::Populated
        }
    }
}

pub struct TablePane {
    focused: bool,
    state: StoreState,
    table_state: TableState,
}

impl TablePane {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: StoreState::default(),
            table_state: TableState::default(),
        }
    }

    fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Put the cursor on `idx` (clamped) and select the customer under it.
    fn set_cursor(&mut self, idx: usize) -> Option<Action> {
        let len = self.state.customers.len();
        if len == 0 {
            return None;
        }
        let clamped = idx.min(len - 1);
        self.table_state.select(Some(clamped));
        self.state
            .customers
            .get(clamped)
            .map(|c| Action::SelectCustomer(c.id.clone()))
    }

    /// Move the cursor and select the customer under it.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn move_cursor(&mut self, delta: isize) -> Option<Action> {
        let next = (self.cursor() as isize + delta).max(0) as usize;
        self.set_cursor(next)
    }

    /// Keep the cursor on the selected customer across refreshes.
    fn sync_cursor(&mut self) {
        let position = self
            .state
            .selected()
            .and_then(|sel| self.state.customers.iter().position(|c| c.id == sel.id));
        match position {
            Some(idx) => self.table_state.select(Some(idx)),
            None if self.state.customers.is_empty() => self.table_state.select(None),
            None => {}
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Customer", "Plan", "Monthly", "Remaining"])
            .style(theme::table_header());

        let rows = self.state.customers.iter().map(|customer| {
            let remaining = customer.remaining_credits();
            let row = Row::new(vec![
                Cell::from(customer.name.clone()),
                Cell::from(Span::styled(
                    customer.plan.to_string(),
                    ratatui::style::Style::default().fg(theme::plan_color(customer.plan)),
                )),
                Cell::from(customer.monthly_credits.to_string()),
                Cell::from(Span::styled(
                    remaining.to_string(),
                    theme::remaining_style(remaining),
                )),
            ]);
            row.style(theme::table_row())
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(16),
                Constraint::Length(11),
                Constraint::Length(8),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut table_state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

impl Component for TablePane {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Ok(self.move_cursor(1)),
            KeyCode::Char('k') | KeyCode::Up => Ok(self.move_cursor(-1)),
            KeyCode::Char('g') => Ok(self.set_cursor(0)),
            KeyCode::Char('G') => Ok(self.set_cursor(usize::MAX)),
            KeyCode::Char('r') => Ok(Some(Action::RequestRefresh)),
            KeyCode::Enter => {
                let action = self
                    .state
                    .customers
                    .get(self.cursor())
                    .map(|c| Action::SelectCustomer(c.id.clone()));
                Ok(action)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::StoreChanged(state) = action {
            self.state = state.clone();
            self.sync_cursor();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Line::from(vec![Span::styled(
                " Customers ",
                theme::title_style(),
            )]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match ListPhase::of(&self.state) {
            ListPhase::Loading => {
                frame.render_widget(
                    Paragraph::new("Loading...").style(theme::field_label()),
                    inner,
                );
            }
            ListPhase::Error(error) => {
                frame.render_widget(
                    Paragraph::new(format!("Error: {error}"))
                        .style(ratatui::style::Style::default().fg(theme::ERROR_RED)),
                    inner,
                );
            }
            ListPhase::Empty => {
                frame.render_widget(
                    Paragraph::new("No customers found").style(theme::field_label()),
                    inner,
                );
            }
            ListPhase::Populated => self.render_table(frame, inner),
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use creditdesk_core::store::LOAD_ERROR_MESSAGE;
    use pretty_assertions::assert_eq;

    use super::*;

    fn state() -> StoreState {
        StoreState::default()
    }

    #[test]
    fn loading_outranks_error_and_empty() {
        let mut s = state();
        s.loading = true;
        s.error = Some(LOAD_ERROR_MESSAGE.into());
        assert_eq!(ListPhase::of(&s), ListPhase::Loading);
    }

    #[test]
    fn error_outranks_empty() {
        let mut s = state();
        s.error = Some(LOAD_ERROR_MESSAGE.into());
        assert_eq!(
            ListPhase::of(&s),
            ListPhase::Error(LOAD_ERROR_MESSAGE.into())
        );
    }

    #[test]
    fn empty_collection_is_its_own_state() {
        let s = state();
        assert_eq!(ListPhase::of(&s), ListPhase::Empty);
    }

    #[test]
    fn populated_when_customers_exist() {
        let mut s = state();
        s.customers = creditdesk_core::fixture::seed_customers();
        assert_eq!(ListPhase::of(&s), ListPhase::Populated);
    }
}
