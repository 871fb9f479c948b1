//! Application state for the TUI.

use std::time::Instant;

use crate::config::AppConfig;
use crate::feed::controller::FeedHandle;
use crate::feed::machine::{ALERT_LOG_CAPACITY, EVENT_LOG_CAPACITY, EXPOSURE_HISTORY_CAPACITY};
use crate::feed::{ConnectionState, ExposurePoint, LogEntry};
use crate::history::BoundedHistory;
use crate::models::{Holding, PriceQuote, RiskHistoryPoint, RiskReport, TradeSide, Transaction};
use crate::session::Session;
use crate::storage::LocalStore;
use crate::tui::input::TextInput;

/// Maximum number of quotes kept in the persisted price history.
pub const PRICE_HISTORY_CAPACITY: usize = 10;

/// Storage key of the persisted price history.
pub const PRICE_HISTORY_KEY: &str = "market.price_history";

/// Notices older than this are cleared automatically.
const NOTICE_TTL: std::time::Duration = std::time::Duration::from_secs(5);

/// Central application state container.
pub struct App {
    // -- Navigation --
    /// The currently active view.
    pub view: View,
    /// Current input mode.
    pub mode: Mode,
    /// Which field (if any) has focus in the active view.
    pub focus: Focus,
    /// Flag to signal application should quit.
    pub should_quit: bool,

    // -- Session --
    pub session: Session,
    /// Inline notice scoped to the active view (clears after a timeout).
    pub notice: Option<Notice>,

    // -- Account view --
    /// Which form the account view shows.
    pub auth_step: AuthStep,
    pub name_input: TextInput,
    pub email_input: TextInput,
    pub password_input: TextInput,
    /// An auth request is in flight.
    pub auth_pending: bool,

    // -- Portfolio data (dashboard + transactions views) --
    pub holdings: Vec<Holding>,
    /// Ledger entries, newest first.
    pub transactions: Vec<Transaction>,

    // -- Transactions view form --
    pub tx_symbol: TextInput,
    pub tx_quantity: TextInput,
    pub tx_price: TextInput,
    pub tx_side: TradeSide,
    /// An add-transaction request is in flight.
    pub tx_pending: bool,

    // -- Market data view --
    pub symbol_input: TextInput,
    pub filter_input: TextInput,
    /// Latest fetched quote.
    pub quote: Option<PriceQuote>,
    /// Persisted cache of recent quotes, newest first.
    pub price_history: BoundedHistory<PriceQuote>,
    /// Symbol of the last successful fetch, auto-refreshed periodically.
    pub last_symbol: Option<String>,
    /// When the last quote arrived, for the auto-refresh schedule.
    pub last_quote_at: Option<Instant>,
    /// A price request is in flight.
    pub price_pending: bool,
    /// How often the last fetched symbol is refreshed.
    pub price_refresh: std::time::Duration,

    // -- Insights view (live feed mirror) --
    /// Handle of the running feed task, if live mode is on.
    pub feed: Option<FeedHandle>,
    pub feed_state: ConnectionState,
    /// Latest risk snapshot from either channel.
    pub risk: Option<RiskReport>,
    pub feed_events: BoundedHistory<LogEntry>,
    pub feed_alerts: BoundedHistory<LogEntry>,
    pub exposure_history: BoundedHistory<ExposurePoint>,
    /// Server-side exposure trend, fetched on entering the view.
    pub risk_trend: Vec<RiskHistoryPoint>,
}

impl App {
    /// Creates the initial state. Starts on the account view unless a
    /// persisted session token was rehydrated.
    pub fn new(session: Session, store: LocalStore, config: &AppConfig) -> Self {
        let view = if session.is_authenticated() {
            View::Dashboard
        } else {
            View::Account
        };

        Self {
            view,
            mode: Mode::Normal,
            focus: Focus::None,
            should_quit: false,

            session,
            notice: None,

            auth_step: AuthStep::Signup,
            name_input: TextInput::new(),
            email_input: TextInput::new(),
            password_input: TextInput::masked(),
            auth_pending: false,

            holdings: Vec::new(),
            transactions: Vec::new(),

            tx_symbol: TextInput::new(),
            tx_quantity: TextInput::new(),
            tx_price: TextInput::new(),
            tx_side: TradeSide::Buy,
            tx_pending: false,

            symbol_input: TextInput::new(),
            filter_input: TextInput::new(),
            quote: None,
            price_history: BoundedHistory::persistent(
                store,
                PRICE_HISTORY_KEY,
                PRICE_HISTORY_CAPACITY,
            ),
            last_symbol: None,
            last_quote_at: None,
            price_pending: false,
            price_refresh: config.feed.price_refresh_interval,

            feed: None,
            feed_state: ConnectionState::Stopped,
            risk: None,
            feed_events: BoundedHistory::new(EVENT_LOG_CAPACITY),
            feed_alerts: BoundedHistory::new(ALERT_LOG_CAPACITY),
            exposure_history: BoundedHistory::new(EXPOSURE_HISTORY_CAPACITY),
            risk_trend: Vec::new(),
        }
    }

    /// The views reachable in the current session state.
    pub fn available_views(&self) -> &'static [View] {
        if self.session.is_authenticated() {
            &[
                View::Dashboard,
                View::Transactions,
                View::MarketData,
                View::Insights,
            ]
        } else {
            &[View::Account]
        }
    }

    /// Switches to the next view.
    pub fn next_view(&mut self) {
        let views = self.available_views();
        if let Some(pos) = views.iter().position(|v| *v == self.view) {
            self.view = views[(pos + 1) % views.len()];
        } else if let Some(first) = views.first() {
            self.view = *first;
        }
        self.enter_view();
    }

    /// Switches to the previous view.
    pub fn previous_view(&mut self) {
        let views = self.available_views();
        if let Some(pos) = views.iter().position(|v| *v == self.view) {
            self.view = views[pos.checked_sub(1).unwrap_or(views.len() - 1)];
        } else if let Some(first) = views.first() {
            self.view = *first;
        }
        self.enter_view();
    }

    /// Resets per-view transient state when a view becomes active.
    fn enter_view(&mut self) {
        self.mode = Mode::Normal;
        self.focus = Focus::None;
        self.notice = None;
    }

    /// Shows an inline notice scoped to the active view.
    pub fn show_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// Clears notices older than the display timeout.
    pub fn clear_stale_notice(&mut self) {
        if let Some(ref notice) = self.notice
            && notice.shown_at.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }

    /// Ends the session: stops the feed, drops the token, clears data.
    pub fn logout(&mut self) {
        if let Some(handle) = self.feed.take() {
            handle.stop();
        }
        self.session.logout();
        self.holdings.clear();
        self.transactions.clear();
        self.risk = None;
        self.risk_trend.clear();
        self.view = View::Account;
        self.auth_step = AuthStep::Login;
        self.enter_view();
    }

    /// The text input currently holding focus, if any.
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::Name => Some(&mut self.name_input),
            Focus::Email => Some(&mut self.email_input),
            Focus::Password => Some(&mut self.password_input),
            Focus::TxSymbol => Some(&mut self.tx_symbol),
            Focus::TxQuantity => Some(&mut self.tx_quantity),
            Focus::TxPrice => Some(&mut self.tx_price),
            Focus::Symbol => Some(&mut self.symbol_input),
            Focus::Filter => Some(&mut self.filter_input),
            Focus::None => None,
        }
    }

    /// Quotes matching the current symbol filter, newest first.
    pub fn filtered_price_history(&self) -> Vec<PriceQuote> {
        let needle = self.filter_input.as_str().trim().to_uppercase();
        if needle.is_empty() {
            return self.price_history.filter(|_| true);
        }
        self.price_history
            .filter(|quote| quote.symbol.to_uppercase().contains(&needle))
    }

    /// Total market value of the holdings, using avg price as the quote.
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.value_at(h.avg_price)).sum()
    }

    /// Total unrealized profit of the holdings (zero while avg price
    /// stands in for a live quote; kept for when quotes are wired in).
    pub fn total_profit(&self) -> f64 {
        self.holdings.iter().map(|h| h.profit_at(h.avg_price)).sum()
    }
}

/// The dashboard pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Account,
    Dashboard,
    Transactions,
    MarketData,
    Insights,
}

impl View {
    /// Returns the display title for the tab bar.
    pub fn title(&self) -> &'static str {
        match self {
            View::Account => "Account",
            View::Dashboard => "Dashboard",
            View::Transactions => "Transactions",
            View::MarketData => "Market Data",
            View::Insights => "Insights",
        }
    }
}

/// Which form the account view shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStep {
    #[default]
    Signup,
    Login,
}

impl AuthStep {
    /// Toggles between the signup and login forms.
    pub fn toggle(&mut self) {
        *self = match self {
            AuthStep::Signup => AuthStep::Login,
            AuthStep::Login => AuthStep::Signup,
        };
    }
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
}

/// Focusable input fields across all views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    None,

    // Account view
    Name,
    Email,
    Password,

    // Transactions view
    TxSymbol,
    TxQuantity,
    TxPrice,

    // Market data view
    Symbol,
    Filter,
}

/// Severity of an inline notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Inline notice with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}
