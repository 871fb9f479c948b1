//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::feed::{ConnectionState, FeedChannel};
use crate::tui::app::{App, NoticeKind};

/// Renders the status bar: feed state, session, inline notice, key hints.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let feed_color = match app.feed_state {
        ConnectionState::Live(FeedChannel::Push) => Color::Green,
        ConnectionState::Live(FeedChannel::Fallback) | ConnectionState::Connecting => {
            Color::Yellow
        }
        ConnectionState::Error | ConnectionState::Disconnected => Color::Red,
        ConnectionState::Stopped => Color::DarkGray,
    };

    let session_span = if app.session.is_authenticated() {
        Span::styled(" Signed In ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" Signed Out ", Style::default().fg(Color::DarkGray))
    };

    let notice_span = match &app.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Info => Color::Cyan,
                NoticeKind::Error => Color::Red,
            };
            Span::styled(format!(" {} ", notice.message), Style::default().fg(color))
        }
        None => Span::raw(""),
    };

    let hints = " q:quit  Tab:views  o:sign out ";

    let line = Line::from(vec![
        Span::styled(
            format!(" Feed: {} ", app.feed_state.label()),
            Style::default().fg(feed_color),
        ),
        Span::raw("│"),
        session_span,
        Span::raw("│"),
        notice_span,
        Span::raw(format!(
            "{:>width$}",
            hints,
            width = area.width.saturating_sub(40) as usize
        )),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
