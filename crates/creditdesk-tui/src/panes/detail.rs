//! Detail pane — shows the selected customer and edits its draft.
//!
//! The editable fields are bound to the shared [`CustomerEditor`]; every
//! keystroke that changes a value goes through `dispatch`. Saving is
//! requested as an action so the app can run it off the render loop; the
//! pane keeps its save affordance disabled while one is in flight.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use creditdesk_core::{CustomerEditor, EditAction, SaveOutcome};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Which editable row the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetailField {
    #[default]
    Plan,
    Limit,
    TopUp,
}

impl DetailField {
    const ALL: [DetailField; 3] = [Self::Plan, Self::Limit, Self::TopUp];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Compose the toast message for a save outcome. Three cases: all
/// succeeded, all failed, mixed.
pub fn outcome_message(outcome: &SaveOutcome) -> String {
    let join = |fields: &[creditdesk_core::EditedField]| {
        fields
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if outcome.failures.is_empty() {
        format!("Successfully updated {}", join(&outcome.successes))
    } else if outcome.successes.is_empty() {
        format!("All failed: {}. Please retry.", join(&outcome.failures))
    } else {
        format!(
            "Successfully updated {}, but failed to update {}.",
            join(&outcome.successes),
            join(&outcome.failures)
        )
    }
}

pub struct DetailPane {
    focused: bool,
    editor: CustomerEditor,
    /// Whether a real customer (not the placeholder) is being edited.
    has_selection: bool,
    active_field: DetailField,
    /// Digits being typed into the limit or top-up row; committed on
    /// Enter, discarded on Esc.
    edit_buffer: Option<String>,
    save_in_flight: bool,
}

impl DetailPane {
    pub fn new(editor: CustomerEditor) -> Self {
        Self {
            focused: false,
            editor,
            has_selection: false,
            active_field: DetailField::default(),
            edit_buffer: None,
            save_in_flight: false,
        }
    }

    fn save_enabled(&self) -> bool {
        self.editor.is_dirty() && !self.save_in_flight
    }

    /// Commit the edit buffer into the draft.
    fn commit_buffer(&mut self) {
        let Some(buffer) = self.edit_buffer.take() else {
            return;
        };
        match self.active_field {
            // Empty input clears the limit.
            DetailField::Limit => {
                let limit = buffer.parse::<u32>().ok();
                self.editor.dispatch(EditAction::SetLimit(limit));
            }
            DetailField::TopUp => {
                let amount = buffer.parse::<u32>().unwrap_or(0);
                self.editor.dispatch(EditAction::SetTopUp(amount));
            }
            DetailField::Plan => {}
        }
    }

    /// Whether an inline edit buffer is open (captures most keys).
    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c @ '0'..='9') => {
                if let Some(buffer) = self.edit_buffer.as_mut() {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.edit_buffer.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Enter => self.commit_buffer(),
            KeyCode::Esc => self.edit_buffer = None,
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        let draft = self.editor.draft();
        let seed = match self.active_field {
            DetailField::Limit => draft
                .per_user_limit
                .map_or_else(String::new, |l| l.to_string()),
            DetailField::TopUp => {
                if draft.top_up > 0 {
                    draft.top_up.to_string()
                } else {
                    String::new()
                }
            }
            DetailField::Plan => return,
        };
        self.edit_buffer = Some(seed);
    }

    fn cycle_plan(&mut self, forward: bool) {
        let plan = self.editor.draft().plan;
        let next = if forward { plan.next() } else { plan.prev() };
        self.editor.dispatch(EditAction::SetPlan(next));
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn field_line(&self, field: DetailField, label: &str, value: String) -> Line<'_> {
        let active = self.focused && self.active_field == field;
        let marker = if active { "› " } else { "  " };
        let value_style = if active {
            theme::field_active()
        } else {
            theme::field_value()
        };
        Line::from(vec![
            Span::styled(marker.to_string(), theme::field_active()),
            Span::styled(format!("{label:<16}"), theme::field_label()),
            Span::styled(value, value_style),
        ])
    }

    #[allow(clippy::too_many_lines)]
    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let original = self.editor.original();
        let draft = self.editor.draft();

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        let buffer_for = |field: DetailField| {
            if self.active_field == field {
                self.edit_buffer.as_ref()
            } else {
                None
            }
        };

        let plan_value = if self.active_field == DetailField::Plan {
            format!("‹ {} ›", draft.plan)
        } else {
            draft.plan.to_string()
        };
        let limit_value = if let Some(buffer) = buffer_for(DetailField::Limit) {
            format!("{buffer}_")
        } else {
            draft
                .per_user_limit
                .map_or_else(|| "unset".to_string(), |l| l.to_string())
        };
        let top_up_value = if let Some(buffer) = buffer_for(DetailField::TopUp) {
            format!("{buffer}_")
        } else {
            draft.top_up.to_string()
        };

        let dirty_marker = if self.editor.is_dirty() {
            Span::styled("  ● unsaved", Style::default().fg(theme::BRASS))
        } else {
            Span::raw("")
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    original.name.clone(),
                    theme::title_style(),
                ),
                dirty_marker,
            ]),
            Line::from(""),
            self.field_line(DetailField::Plan, "Plan", plan_value),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Monthly Credits ", theme::field_label()),
                Span::styled(original.monthly_credits.to_string(), theme::field_value()),
            ]),
            Line::from(vec![
                Span::styled("  Used            ", theme::field_label()),
                Span::styled(original.used_credits.to_string(), theme::field_value()),
            ]),
            Line::from(vec![
                Span::styled("  Remaining       ", theme::field_label()),
                Span::styled(
                    original.remaining_credits().to_string(),
                    theme::remaining_style(original.remaining_credits()),
                ),
            ]),
            Line::from(""),
            self.field_line(DetailField::Limit, "Per-user limit", limit_value),
            Line::from(""),
            self.field_line(DetailField::TopUp, "Top-up", top_up_value),
        ];
        frame.render_widget(Paragraph::new(lines), layout[0]);

        let save_hint = if self.save_in_flight {
            Span::styled("saving…", theme::key_hint())
        } else if self.save_enabled() {
            Span::styled("save", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled("save (no changes)", theme::key_hint())
        };
        let hints = Line::from(vec![
            Span::styled("s ", theme::key_hint_key()),
            save_hint,
            Span::styled("  ←/→ ", theme::key_hint_key()),
            Span::styled("plan  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("edit field", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

impl Component for DetailPane {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.has_selection {
            return Ok(None);
        }

        if self.edit_buffer.is_some() {
            self.handle_edit_key(key);
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.active_field = self.active_field.next();
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.active_field = self.active_field.prev();
                Ok(None)
            }
            KeyCode::Left | KeyCode::Char('h') if self.active_field == DetailField::Plan => {
                self.cycle_plan(false);
                Ok(None)
            }
            KeyCode::Right | KeyCode::Char('l') if self.active_field == DetailField::Plan => {
                self.cycle_plan(true);
                Ok(None)
            }
            KeyCode::Enter => {
                self.begin_edit();
                Ok(None)
            }
            KeyCode::Char('s') => {
                if self.save_enabled() {
                    self.save_in_flight = true;
                    Ok(Some(Action::RequestSave))
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StoreChanged(state) => {
                self.has_selection = state.selected().is_some();
                if !self.has_selection {
                    self.edit_buffer = None;
                }
                Ok(None)
            }
            Action::SaveCompleted(outcome) => {
                self.save_in_flight = false;
                if outcome.attempted() {
                    Ok(Some(Action::ShowToast(outcome_message(outcome))))
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Line::from(vec![Span::styled(
                " Detail ",
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

        if self.has_selection {
            self.render_editor(frame, inner);
        } else {
            frame.render_widget(
                Paragraph::new("Select a customer").style(theme::field_label()),
                inner,
            );
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.edit_buffer = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use creditdesk_core::EditedField;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn all_successes_message() {
        let outcome = SaveOutcome {
            successes: vec![EditedField::Plan, EditedField::TopUpCredits],
            failures: vec![],
        };
        assert_eq!(
            outcome_message(&outcome),
            "Successfully updated Plan, Top-up credits"
        );
    }

    #[test]
    fn all_failures_message() {
        let outcome = SaveOutcome {
            successes: vec![],
            failures: vec![EditedField::Plan, EditedField::PerUserLimit],
        };
        assert_eq!(
            outcome_message(&outcome),
            "All failed: Plan, Per-user limit. Please retry."
        );
    }

    #[test]
    fn mixed_outcome_message() {
        let outcome = SaveOutcome {
            successes: vec![EditedField::Plan],
            failures: vec![EditedField::TopUpCredits],
        };
        assert_eq!(
            outcome_message(&outcome),
            "Successfully updated Plan, but failed to update Top-up credits."
        );
    }
}
