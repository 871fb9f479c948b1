//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::feed::FeedUpdate;
use crate::models::{
    Holding, LoginRequest, NewTransaction, PriceQuote, RiskHistoryPoint, SignupRequest, TradeSide,
    Transaction,
};

use super::app::{App, AuthStep, Focus, Mode, NoticeKind, View};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// Update from the live risk feed.
    Feed(FeedUpdate),

    /// Signup request finished.
    SignupDone(Result<(), String>),
    /// Login request finished; carries the bearer token on success.
    LoginDone(Result<String, String>),
    /// Holdings fetch finished.
    HoldingsLoaded(Result<Vec<Holding>, String>),
    /// Ledger fetch finished.
    TransactionsLoaded(Result<Vec<Transaction>, String>),
    /// Add-transaction request finished; carries the symbol on success.
    TransactionAdded(Result<String, String>),
    /// Price fetch finished.
    PriceLoaded(Result<PriceQuote, String>),
    /// Exposure trend fetch finished.
    RiskTrendLoaded(Result<Vec<RiskHistoryPoint>, String>),

    /// Request to quit the application.
    Quit,
}

/// Actions that require external handling (HTTP calls, feed lifecycle).
#[derive(Debug)]
pub enum Action {
    /// Register an account.
    Signup(SignupRequest),
    /// Exchange credentials for a token.
    Login(LoginRequest),
    /// Fetch holdings and the transaction ledger.
    FetchPortfolio,
    /// Record a trade.
    AddTransaction(NewTransaction),
    /// Fetch the latest quote for a symbol.
    FetchPrice(String),
    /// Fetch the server-side exposure trend.
    FetchRiskTrend,
    /// Start the live risk feed.
    StartFeed,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),

        Message::Feed(update) => {
            apply_feed_update(app, update);
            None
        }

        Message::SignupDone(result) => {
            app.auth_pending = false;
            match result {
                Ok(()) => {
                    app.show_notice(NoticeKind::Info, "Registered. Please log in.");
                    app.auth_step = AuthStep::Login;
                    app.focus = Focus::Email;
                }
                // Form state stays intact for retry.
                Err(e) => app.show_notice(NoticeKind::Error, format!("Signup failed: {e}")),
            }
            None
        }
        Message::LoginDone(result) => {
            app.auth_pending = false;
            match result {
                Ok(token) => {
                    app.session.login(token);
                    app.password_input.clear();
                    app.view = View::Dashboard;
                    app.focus = Focus::None;
                    app.mode = Mode::Normal;
                    Some(Action::FetchPortfolio)
                }
                Err(e) => {
                    app.show_notice(NoticeKind::Error, format!("Login failed: {e}"));
                    None
                }
            }
        }

        Message::HoldingsLoaded(result) => {
            match result {
                Ok(holdings) => app.holdings = holdings,
                Err(e) => app.show_notice(NoticeKind::Error, format!("Holdings: {e}")),
            }
            None
        }
        Message::TransactionsLoaded(result) => {
            match result {
                Ok(mut transactions) => {
                    // Newest first; timestamps are ISO-8601 so the
                    // lexicographic order is the chronological order.
                    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                    app.transactions = transactions;
                }
                Err(e) => app.show_notice(NoticeKind::Error, format!("Transactions: {e}")),
            }
            None
        }
        Message::TransactionAdded(result) => {
            app.tx_pending = false;
            match result {
                Ok(symbol) => {
                    app.tx_symbol.clear();
                    app.tx_quantity.clear();
                    app.tx_price.clear();
                    app.tx_side = TradeSide::Buy;
                    app.show_notice(NoticeKind::Info, format!("Transaction recorded ({symbol})"));
                    Some(Action::FetchPortfolio)
                }
                Err(e) => {
                    app.show_notice(NoticeKind::Error, format!("Add transaction failed: {e}"));
                    None
                }
            }
        }

        Message::PriceLoaded(result) => {
            app.price_pending = false;
            match result {
                Ok(quote) => {
                    app.last_symbol = Some(quote.symbol.clone());
                    app.last_quote_at = Some(std::time::Instant::now());
                    app.price_history.append(quote.clone());
                    app.quote = Some(quote);
                }
                Err(e) => {
                    // Restart the refresh clock so a failed refresh waits a
                    // full cycle instead of refiring on every tick.
                    if app.last_quote_at.is_some() {
                        app.last_quote_at = Some(std::time::Instant::now());
                    }
                    app.show_notice(NoticeKind::Error, format!("Market data: {e}"));
                }
            }
            None
        }

        Message::RiskTrendLoaded(result) => {
            match result {
                Ok(points) => app.risk_trend = points,
                Err(e) => app.show_notice(NoticeKind::Error, format!("Risk history: {e}")),
            }
            None
        }

        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Mirrors one feed update into the view-side copies.
fn apply_feed_update(app: &mut App, update: FeedUpdate) {
    match update {
        FeedUpdate::State(state) => app.feed_state = state,
        FeedUpdate::Snapshot(report) => app.risk = Some(report),
        FeedUpdate::Event(entry) => app.feed_events.append(entry),
        FeedUpdate::Alert(entry) => app.feed_alerts.append(entry),
        FeedUpdate::History(point) => app.exposure_history.append(point),
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => handle_tick(app),
    }
}

/// Periodic housekeeping: stale notices and the market auto-refresh.
fn handle_tick(app: &mut App) -> Option<Action> {
    app.clear_stale_notice();

    if !app.price_pending
        && let Some(symbol) = app.last_symbol.clone()
        && let Some(at) = app.last_quote_at
        && at.elapsed() >= app.price_refresh
    {
        app.price_pending = true;
        return Some(Action::FetchPrice(symbol));
    }
    None
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    // Global keys (work in any mode)
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() && app.mode == Mode::Normal => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            app.notice = None;
            return None;
        }
        _ => {}
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => handle_insert_mode(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        // View navigation
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.previous_view();
            } else {
                app.next_view();
            }
            view_entry_action(app)
        }
        KeyCode::BackTab => {
            app.previous_view();
            view_entry_action(app)
        }

        // Sign out
        KeyCode::Char('o') if app.session.is_authenticated() => {
            app.logout();
            None
        }

        _ => match app.view {
            View::Account => handle_account_keys(app, key),
            View::Dashboard => handle_dashboard_keys(app, key),
            View::Transactions => handle_transactions_keys(app, key),
            View::MarketData => handle_market_keys(app, key),
            View::Insights => handle_insights_keys(app, key),
        },
    }
}

/// Data to fetch when a view becomes active.
fn view_entry_action(app: &App) -> Option<Action> {
    match app.view {
        View::Dashboard | View::Transactions => Some(Action::FetchPortfolio),
        View::Insights => Some(Action::FetchRiskTrend),
        _ => None,
    }
}

/// Handles keys for the account view.
fn handle_account_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('t') => {
            app.auth_step.toggle();
            app.focus = Focus::None;
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.focus = next_account_focus(app.auth_step, app.focus);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.focus = previous_account_focus(app.auth_step, app.focus);
            None
        }
        KeyCode::Char('i') => {
            if app.focus == Focus::None {
                app.focus = next_account_focus(app.auth_step, Focus::None);
            }
            app.mode = Mode::Insert;
            None
        }
        KeyCode::Enter => submit_auth_form(app),
        _ => None,
    }
}

/// Handles keys for the dashboard view.
fn handle_dashboard_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('r') => {
            app.notice = None;
            Some(Action::FetchPortfolio)
        }
        _ => None,
    }
}

/// Handles keys for the transactions view.
fn handle_transactions_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.focus = match app.focus {
                Focus::TxSymbol => Focus::TxQuantity,
                Focus::TxQuantity => Focus::TxPrice,
                _ => Focus::TxSymbol,
            };
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.focus = match app.focus {
                Focus::TxPrice => Focus::TxQuantity,
                Focus::TxQuantity => Focus::TxSymbol,
                _ => Focus::TxPrice,
            };
            None
        }
        KeyCode::Char('i') => {
            if app.focus == Focus::None {
                app.focus = Focus::TxSymbol;
            }
            app.mode = Mode::Insert;
            None
        }
        KeyCode::Char('b') => {
            app.tx_side.toggle();
            None
        }
        KeyCode::Char('r') => Some(Action::FetchPortfolio),
        KeyCode::Enter => submit_transaction_form(app),
        _ => None,
    }
}

/// Handles keys for the market data view.
fn handle_market_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('i') => {
            app.focus = Focus::Symbol;
            app.mode = Mode::Insert;
            None
        }
        KeyCode::Char('/') => {
            app.focus = Focus::Filter;
            app.mode = Mode::Insert;
            None
        }
        KeyCode::Char('c') => {
            app.filter_input.clear();
            None
        }
        KeyCode::Char('x') => {
            app.price_history.clear();
            app.quote = None;
            app.last_symbol = None;
            None
        }
        KeyCode::Char('r') => match app.last_symbol.clone() {
            Some(symbol) if !app.price_pending => {
                app.price_pending = true;
                Some(Action::FetchPrice(symbol))
            }
            _ => None,
        },
        KeyCode::Enter => submit_price_lookup(app),
        _ => None,
    }
}

/// Handles keys for the insights view.
fn handle_insights_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('l') => {
            if let Some(handle) = app.feed.take() {
                // Stopped state arrives as a feed update.
                handle.stop();
                None
            } else {
                Some(Action::StartFeed)
            }
        }
        KeyCode::Char('r') => Some(Action::FetchRiskTrend),
        _ => None,
    }
}

/// Handles keys in insert mode.
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => handle_insert_enter(app),
        KeyCode::Backspace => {
            if let Some(input) = app.focused_input() {
                input.backspace();
            }
            None
        }
        KeyCode::Left => {
            if let Some(input) = app.focused_input() {
                input.move_left();
            }
            None
        }
        KeyCode::Right => {
            if let Some(input) = app.focused_input() {
                input.move_right();
            }
            None
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.focused_input() {
                input.insert(c);
            }
            None
        }
        _ => None,
    }
}

/// Enter in insert mode advances to the next field or submits the form.
fn handle_insert_enter(app: &mut App) -> Option<Action> {
    match app.focus {
        Focus::Name => {
            app.focus = Focus::Email;
            None
        }
        Focus::Email => {
            app.focus = Focus::Password;
            None
        }
        Focus::Password => {
            app.mode = Mode::Normal;
            submit_auth_form(app)
        }
        Focus::TxSymbol => {
            app.focus = Focus::TxQuantity;
            None
        }
        Focus::TxQuantity => {
            app.focus = Focus::TxPrice;
            None
        }
        Focus::TxPrice => {
            app.mode = Mode::Normal;
            submit_transaction_form(app)
        }
        Focus::Symbol => {
            app.mode = Mode::Normal;
            submit_price_lookup(app)
        }
        Focus::Filter => {
            app.mode = Mode::Normal;
            None
        }
        Focus::None => {
            app.mode = Mode::Normal;
            None
        }
    }
}

/// Field order of the account form for the current step.
fn account_fields(step: AuthStep) -> &'static [Focus] {
    match step {
        AuthStep::Signup => &[Focus::Name, Focus::Email, Focus::Password],
        AuthStep::Login => &[Focus::Email, Focus::Password],
    }
}

fn next_account_focus(step: AuthStep, focus: Focus) -> Focus {
    let fields = account_fields(step);
    match fields.iter().position(|f| *f == focus) {
        Some(pos) => fields[(pos + 1) % fields.len()],
        None => fields[0],
    }
}

fn previous_account_focus(step: AuthStep, focus: Focus) -> Focus {
    let fields = account_fields(step);
    match fields.iter().position(|f| *f == focus) {
        Some(pos) => fields[pos.checked_sub(1).unwrap_or(fields.len() - 1)],
        None => fields[fields.len() - 1],
    }
}

/// Validates and submits the signup or login form.
fn submit_auth_form(app: &mut App) -> Option<Action> {
    if app.auth_pending {
        return None;
    }

    let email = app.email_input.as_str().trim().to_string();
    let password = app.password_input.as_str().to_string();

    match app.auth_step {
        AuthStep::Signup => {
            let name = app.name_input.as_str().trim().to_string();
            if name.is_empty() || email.is_empty() || password.is_empty() {
                app.show_notice(NoticeKind::Error, "Please fill in all fields.");
                return None;
            }
            app.auth_pending = true;
            Some(Action::Signup(SignupRequest {
                name,
                email,
                password,
            }))
        }
        AuthStep::Login => {
            if email.is_empty() || password.is_empty() {
                app.show_notice(NoticeKind::Error, "Please fill in all fields.");
                return None;
            }
            app.auth_pending = true;
            Some(Action::Login(LoginRequest { email, password }))
        }
    }
}

/// Validates and submits the add-transaction form.
fn submit_transaction_form(app: &mut App) -> Option<Action> {
    if app.tx_pending {
        return None;
    }

    let symbol = app.tx_symbol.as_str().trim().to_uppercase();
    let quantity = app.tx_quantity.as_str().trim().parse::<f64>();
    let price = app.tx_price.as_str().trim().parse::<f64>();

    match (symbol.is_empty(), quantity, price) {
        (false, Ok(quantity), Ok(price)) if quantity > 0.0 && price > 0.0 => {
            app.tx_pending = true;
            Some(Action::AddTransaction(NewTransaction {
                symbol,
                quantity,
                price,
                side: app.tx_side,
            }))
        }
        _ => {
            app.show_notice(
                NoticeKind::Error,
                "Please fill in all fields before submitting.",
            );
            None
        }
    }
}

/// Validates and submits a price lookup.
fn submit_price_lookup(app: &mut App) -> Option<Action> {
    let symbol = app.symbol_input.as_str().trim().to_uppercase();
    if symbol.is_empty() {
        app.show_notice(NoticeKind::Error, "Enter a stock symbol, e.g. AAPL.");
        return None;
    }
    if app.price_pending {
        return None;
    }
    app.price_pending = true;
    app.notice = None;
    Some(Action::FetchPrice(symbol))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use tempfile::TempDir;

    use super::*;
    use crate::config::{AppConfig, FeedConfig, ServiceConfig};
    use crate::models::PriceQuote;
    use crate::session::Session;
    use crate::storage::LocalStore;

    fn test_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        let session = Session::from_store(store.clone());
        let config = AppConfig {
            services: ServiceConfig {
                gateway_url: "http://localhost:8080".to_string(),
                market_data_url: "http://localhost:8083".to_string(),
            },
            feed: FeedConfig {
                stream_url: "ws://localhost:8080/analytics/stream".to_string(),
                poll_interval: Duration::from_secs(5),
                price_refresh_interval: Duration::from_secs(30),
                user_id: 1,
            },
            data_dir: dir.path().to_path_buf(),
        };
        (App::new(session, store, &config), dir)
    }

    fn key(app: &mut App, code: KeyCode) -> Option<Action> {
        update(
            app,
            Message::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn past_instant(secs: u64) -> Instant {
        Instant::now()
            .checked_sub(Duration::from_secs(secs))
            .expect("system uptime too short for backdated instant")
    }

    #[test]
    fn stale_quote_triggers_auto_refresh() {
        let (mut app, _dir) = test_app();
        app.last_symbol = Some("AAPL".to_string());
        app.last_quote_at = Some(past_instant(31));

        let action = update(&mut app, Message::Input(Event::Tick));
        assert!(matches!(action, Some(Action::FetchPrice(ref s)) if s == "AAPL"));
        assert!(app.price_pending);
    }

    #[test]
    fn failed_refresh_waits_a_full_cycle() {
        let (mut app, _dir) = test_app();
        app.last_symbol = Some("AAPL".to_string());
        app.last_quote_at = Some(past_instant(31));

        let action = update(&mut app, Message::Input(Event::Tick));
        assert!(matches!(action, Some(Action::FetchPrice(_))));

        let action = update(&mut app, Message::PriceLoaded(Err("boom".to_string())));
        assert!(action.is_none());
        assert!(!app.price_pending);

        // The clock restarted on failure; ticks inside the refresh period
        // must not refire the request.
        for _ in 0..4 {
            assert!(update(&mut app, Message::Input(Event::Tick)).is_none());
        }
    }

    #[test]
    fn clear_filter_key_keeps_price_history() {
        let (mut app, _dir) = test_app();
        app.view = View::MarketData;
        for c in "AAPL".chars() {
            app.filter_input.insert(c);
        }
        app.price_history.append(PriceQuote {
            symbol: "AAPL".to_string(),
            price: 161.8,
            timestamp: "t".to_string(),
        });

        assert!(key(&mut app, KeyCode::Char('c')).is_none());
        assert!(app.filter_input.is_empty());
        assert_eq!(app.price_history.len(), 1);
    }

    #[test]
    fn clear_history_key_empties_the_cache() {
        let (mut app, _dir) = test_app();
        app.view = View::MarketData;
        app.last_symbol = Some("AAPL".to_string());
        app.price_history.append(PriceQuote {
            symbol: "AAPL".to_string(),
            price: 161.8,
            timestamp: "t".to_string(),
        });

        assert!(key(&mut app, KeyCode::Char('x')).is_none());
        assert!(app.price_history.is_empty());
        assert!(app.quote.is_none());
        assert!(app.last_symbol.is_none());
    }
}
