//! Risk insights: live feed mirror, exposure trends, and diagnostic logs.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Sparkline},
};

use crate::feed::{ConnectionState, FeedChannel};
use crate::tui::app::App;

/// Renders the insights view.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(columns[0]);
    render_risk(frame, left[0], app);
    render_exposure(frame, left[1], app);
    render_trend(frame, left[2], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);
    render_events(frame, right[0], app);
    render_alerts(frame, right[1], app);
}

fn render_risk(frame: &mut Frame, area: Rect, app: &App) {
    let feed_color = match app.feed_state {
        ConnectionState::Live(FeedChannel::Push) => Color::Green,
        ConnectionState::Live(FeedChannel::Fallback) | ConnectionState::Connecting => {
            Color::Yellow
        }
        ConnectionState::Error | ConnectionState::Disconnected => Color::Red,
        ConnectionState::Stopped => Color::DarkGray,
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(" Feed: ", Style::default().fg(Color::Gray)),
        Span::styled(app.feed_state.label(), Style::default().fg(feed_color)),
        Span::styled("   l:toggle  r:refetch trend", Style::default().fg(Color::DarkGray)),
    ])];

    match &app.risk {
        Some(risk) => {
            lines.push(Line::from(vec![
                Span::styled(" Total Exposure  ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("${:.2}", risk.total_exposure),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled(" Open Positions  ", Style::default().fg(Color::Gray)),
                Span::raw(risk.position_count().to_string()),
            ]));
            let positions = risk
                .positions
                .iter()
                .map(|(symbol, qty)| format!("{symbol}:{qty}"))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(Line::from(vec![
                Span::styled(" Net Quantities  ", Style::default().fg(Color::Gray)),
                Span::raw(positions),
            ]));
            lines.push(Line::from(Span::styled(
                format!(" updated {}", risk.last_updated),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            " No snapshot yet. Press l to start the feed.",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let para =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Risk "));
    frame.render_widget(para, area);
}

fn render_exposure(frame: &mut Frame, area: Rect, app: &App) {
    // History is stored newest first; the chart reads left to right.
    let mut points: Vec<u64> = app
        .exposure_history
        .iter()
        .map(|p| p.value.max(0.0).round() as u64)
        .collect();
    points.reverse();

    let title = format!(" Exposure ({} pts) ", points.len());
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Cyan))
        .data(&points);
    frame.render_widget(spark, area);
}

fn render_trend(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .risk_trend
        .iter()
        .map(|point| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {}  ", point.date),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(format!("${:.2}", point.exposure)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Daily Exposure "),
    );
    frame.render_widget(list, area);
}

fn render_events(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .feed_events
        .iter()
        .map(|entry| ListItem::new(Line::raw(format!(" {}", entry.text))))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Events "));
    frame.render_widget(list, area);
}

fn render_alerts(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .feed_alerts
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(Span::styled(
                format!(" {}", entry.text),
                Style::default().fg(Color::Red),
            )))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Alerts "));
    frame.render_widget(list, area);
}
