//! Trade entry form, holdings with P&L, and the transaction ledger.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::models::TradeSide;
use crate::tui::app::{App, Focus};

use super::input_line;

/// Renders the transactions view.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    render_form(frame, columns[0], app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[1]);
    render_holdings(frame, rows[0], app);
    render_ledger(frame, rows[1], app);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let side_color = match app.tx_side {
        TradeSide::Buy => Color::Green,
        TradeSide::Sell => Color::Red,
    };

    let mut lines = vec![
        Line::raw(""),
        input_line(app, "Symbol", &app.tx_symbol, Focus::TxSymbol),
        input_line(app, "Quantity", &app.tx_quantity, Focus::TxQuantity),
        input_line(app, "Price", &app.tx_price, Focus::TxPrice),
        Line::from(vec![
            Span::styled(" Side      ", Style::default().fg(Color::Gray)),
            Span::styled(app.tx_side.label(), Style::default().fg(side_color)),
        ]),
        Line::raw(""),
    ];

    if app.tx_pending {
        lines.push(Line::from(Span::styled(
            " Adding...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Enter:add  b:side  i:edit",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::styled(
            " j/k:fields  r:refresh",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add Transaction "),
    );
    frame.render_widget(para, area);
}

fn render_holdings(frame: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["Symbol", "Qty", "Avg", "Value", "P&L"])
        .style(Style::default().fg(Color::Cyan));

    let rows: Vec<Row> = app
        .holdings
        .iter()
        .map(|h| {
            // Avg price stands in for a live quote, as the services do not
            // stream per-holding prices to this view.
            let price = h.avg_price;
            let (profit_text, profit_color) = super::signed_amount(h.profit_at(price));
            Row::new(vec![
                Cell::from(h.symbol.clone()),
                Cell::from(format!("{:.2}", h.quantity)),
                Cell::from(format!("${price:.2}")),
                Cell::from(format!("${:.2}", h.value_at(price))),
                Cell::from(profit_text).style(Style::default().fg(profit_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Holdings "));
    frame.render_widget(table, area);
}

fn render_ledger(frame: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["Date", "Symbol", "Side", "Qty", "Price", "Total"])
        .style(Style::default().fg(Color::Cyan));

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .map(|t| {
            let side_color = match t.side {
                TradeSide::Buy => Color::Green,
                TradeSide::Sell => Color::Red,
            };
            Row::new(vec![
                Cell::from(t.timestamp.clone()),
                Cell::from(t.symbol.clone()),
                Cell::from(t.side.label()).style(Style::default().fg(side_color)),
                Cell::from(format!("{:.2}", t.quantity)),
                Cell::from(format!("${:.2}", t.price)),
                Cell::from(format!("${:.2}", t.total())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" History "));
    frame.render_widget(table, area);
}
