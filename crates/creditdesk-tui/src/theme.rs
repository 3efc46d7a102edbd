//! Ledger palette and semantic styling for the TUI.

use creditdesk_core::Plan;
use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const BRASS: Color = Color::Rgb(222, 179, 92); // #deb35c
pub const TEAL: Color = Color::Rgb(95, 207, 191); // #5fcfbf
pub const PERIWINKLE: Color = Color::Rgb(146, 162, 235); // #92a2eb
pub const SUCCESS_GREEN: Color = Color::Rgb(122, 219, 125); // #7adb7d
pub const ERROR_RED: Color = Color::Rgb(235, 103, 94); // #eb675e

// ── Extended Palette ──────────────────────────────────────────────────

pub const PALE_GRAY: Color = Color::Rgb(196, 200, 212); // #c4c8d4
pub const SLATE: Color = Color::Rgb(106, 114, 142); // #6a728e
pub const BG_HIGHLIGHT: Color = Color::Rgb(44, 47, 58); // #2c2f3a

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Border for the focused pane.
pub fn border_focused() -> Style {
    Style::default().fg(BRASS)
}

/// Border for an unfocused pane.
pub fn border_default() -> Style {
    Style::default().fg(SLATE)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(PALE_GRAY)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(BRASS)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Field label in the detail pane.
pub fn field_label() -> Style {
    Style::default().fg(SLATE)
}

/// Field value in the detail pane.
pub fn field_value() -> Style {
    Style::default().fg(PALE_GRAY)
}

/// The field the cursor is on.
pub fn field_active() -> Style {
    Style::default().fg(BRASS).add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  Tab focus").
pub fn key_hint() -> Style {
    Style::default().fg(SLATE)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Toast overlay.
pub fn toast() -> Style {
    Style::default()
        .fg(BRASS)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Remaining-credits value — red once a customer is over budget.
pub fn remaining_style(remaining: i64) -> Style {
    if remaining < 0 {
        Style::default().fg(ERROR_RED)
    } else {
        Style::default().fg(PALE_GRAY)
    }
}

/// Tier accent color for a plan.
pub fn plan_color(plan: Plan) -> Color {
    match plan {
        Plan::Trial => SLATE,
        Plan::Lite => PALE_GRAY,
        Plan::Basic => TEAL,
        Plan::Enterprise => PERIWINKLE,
        Plan::Ultimate => BRASS,
    }
}
