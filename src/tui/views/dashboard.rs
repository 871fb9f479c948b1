//! Portfolio overview: allocation chart plus holdings table.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::tui::app::App;

/// Renders the dashboard view.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    if app.holdings.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            " No holdings yet. Press r to refresh.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL).title(" Portfolio "));
        frame.render_widget(para, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);

    render_summary(frame, chunks[0], app);
    render_allocation(frame, chunks[1], app);
    render_holdings(frame, chunks[2], app);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let (profit_text, profit_color) = super::signed_amount(app.total_profit());
    let line = Line::from(vec![
        Span::styled(
            format!(" Total Value: ${:.2}  ", app.total_value()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("P&L: {profit_text} "),
            Style::default().fg(profit_color),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("{} positions", app.holdings.len()),
            Style::default().fg(Color::White),
        ),
    ]);
    let para = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Summary "));
    frame.render_widget(para, area);
}

fn render_allocation(frame: &mut Frame, area: Rect, app: &App) {
    let bars: Vec<Bar> = app
        .holdings
        .iter()
        .map(|h| {
            Bar::default()
                .label(Line::from(h.symbol.clone()))
                .value(h.value_at(h.avg_price).round() as u64)
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Allocation "))
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_holdings(frame: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["Symbol", "Quantity", "Avg Price", "Value"])
        .style(Style::default().fg(Color::Cyan));

    let rows: Vec<Row> = app
        .holdings
        .iter()
        .map(|h| {
            Row::new(vec![
                Cell::from(h.symbol.clone()),
                Cell::from(format!("{:.2}", h.quantity)),
                Cell::from(format!("${:.2}", h.avg_price)),
                Cell::from(format!("${:.2}", h.value_at(h.avg_price))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Holdings "));
    frame.render_widget(table, area);
}
