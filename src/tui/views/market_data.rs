//! Price lookup with a persisted, filterable quote history.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::tui::app::{App, Focus};

use super::input_line;

/// Renders the market data view.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    render_lookup(frame, chunks[0], app);
    render_quote(frame, chunks[1], app);
    render_history(frame, chunks[2], app);
}

fn render_lookup(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![input_line(app, "Symbol", &app.symbol_input, Focus::Symbol)];

    if app.price_pending {
        lines.push(Line::from(Span::styled(
            " Fetching...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Enter:fetch  i:edit  /:filter  c:clear filter  x:clear history  r:refetch",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Price Lookup "),
    );
    frame.render_widget(para, area);
}

fn render_quote(frame: &mut Frame, area: Rect, app: &App) {
    let lines = match &app.quote {
        Some(quote) => vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", quote.symbol),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("${:.2}", quote.price),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(Span::styled(
                format!(" as of {}", quote.timestamp),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                format!(" auto-refresh every {}s", app.price_refresh.as_secs()),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![Line::from(Span::styled(
            " No quote yet. Enter a symbol and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Latest Quote "));
    frame.render_widget(para, area);
}

fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(input_line(app, "Filter", &app.filter_input, Focus::Filter)),
        chunks[0],
    );

    let quotes = app.filtered_price_history();
    let header =
        Row::new(vec!["Symbol", "Price", "Fetched"]).style(Style::default().fg(Color::Cyan));

    let rows: Vec<Row> = quotes
        .iter()
        .map(|q| {
            Row::new(vec![
                Cell::from(q.symbol.clone()),
                Cell::from(format!("${:.2}", q.price)),
                Cell::from(q.timestamp.clone()),
            ])
        })
        .collect();

    let title = format!(
        " Recent Quotes ({}/{}) ",
        quotes.len(),
        app.price_history.capacity()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, chunks[1]);
}
