//! Top-level rendering: tab bar, active view, status bar.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use super::app::{App, View};
use super::components::{status_bar, tab_bar};
use super::views;

/// Renders the whole frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    tab_bar::render(frame, chunks[0], app);

    match app.view {
        View::Account => views::account::render(frame, chunks[1], app),
        View::Dashboard => views::dashboard::render(frame, chunks[1], app),
        View::Transactions => views::transactions::render(frame, chunks[1], app),
        View::MarketData => views::market_data::render(frame, chunks[1], app),
        View::Insights => views::insights::render(frame, chunks[1], app),
    }

    status_bar::render(frame, chunks[2], app);
}
