//! Per-view render modules.

pub mod account;
pub mod dashboard;
pub mod insights;
pub mod market_data;
pub mod transactions;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::tui::app::{App, Focus, Mode};
use crate::tui::input::TextInput;

/// Renders one labeled input field as a line, highlighting focus and
/// showing a cursor marker while editing.
fn input_line<'a>(app: &App, label: &'a str, input: &TextInput, focus: Focus) -> Line<'a> {
    let focused = app.focus == focus;
    let editing = focused && app.mode == Mode::Insert;

    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut text = input.display();
    if editing {
        let byte_idx = text
            .char_indices()
            .nth(input.cursor)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        text.insert(byte_idx, '▏');
    }

    Line::from(vec![
        Span::styled(format!(" {label:<10}"), label_style),
        Span::styled(text, Style::default().fg(Color::White)),
    ])
}

/// Formats a dollar amount with sign for P&L cells.
fn signed_amount(value: f64) -> (String, Color) {
    if value >= 0.0 {
        (format!("+${value:.2}"), Color::Green)
    } else {
        (format!("-${:.2}", value.abs()), Color::Red)
    }
}
