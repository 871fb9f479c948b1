//! Combined signup/login view, shown while no session token is held.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::{App, AuthStep, Focus};

use super::input_line;

/// Renders the account view.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let form = centered(area, 56, 12);

    let title = match app.auth_step {
        AuthStep::Signup => " Sign Up ",
        AuthStep::Login => " Login ",
    };

    let mut lines: Vec<Line> = vec![Line::raw("")];
    if app.auth_step == AuthStep::Signup {
        lines.push(input_line(app, "Name", &app.name_input, Focus::Name));
    }
    lines.push(input_line(app, "Email", &app.email_input, Focus::Email));
    lines.push(input_line(
        app,
        "Password",
        &app.password_input,
        Focus::Password,
    ));
    lines.push(Line::raw(""));

    if app.auth_pending {
        lines.push(Line::from(Span::styled(
            " Submitting...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        let other = match app.auth_step {
            AuthStep::Signup => "login",
            AuthStep::Login => "sign up",
        };
        lines.push(Line::from(Span::styled(
            format!(" Enter:submit  i:edit  j/k:fields  t:{other} instead"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(para, form);
}

/// Centers a fixed-size rect within `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
