//! Main loop: render, receive, update, dispatch.
//!
//! Side effects requested by [`update`](super::event::update) come back as
//! [`Action`]s and are executed here, each as a spawned task that reports
//! its outcome with a [`Message`]. Failures never escape the task that
//! issued the request; they arrive as `Err` payloads scoped to the view.

use tokio::sync::mpsc;
use tracing::info;

use crate::Result;
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::feed::LiveFeedController;
use crate::session::Session;
use crate::storage::LocalStore;

use super::app::App;
use super::event::{Action, Message, spawn_event_reader, spawn_tick_timer, update};
use super::{Tui, restore_terminal, setup_terminal, ui};

/// UI tick period in milliseconds.
const TICK_MS: u64 = 250;

/// Runs the dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be initialized or restored;
/// remote-service failures never abort the loop.
pub async fn run(config: AppConfig) -> Result<()> {
    let store = LocalStore::open(&config.data_dir);
    let session = Session::from_store(store.clone());
    let api = ApiClient::new(&config.services);

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), TICK_MS);

    let mut app = App::new(session, store, &config);
    let mut terminal = setup_terminal()?;
    info!("Dashboard started");

    let result = event_loop(&mut terminal, &mut app, &mut rx, &api, &config, &tx).await;

    // Feed and terminal teardown runs on every exit path, including a
    // loop error.
    if let Some(handle) = app.feed.take() {
        handle.stop();
    }
    restore_terminal(&mut terminal)?;
    info!("Dashboard stopped");
    result
}

/// Render/receive/update/dispatch until quit or a render failure.
async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    api: &ApiClient,
    config: &AppConfig,
    tx: &mpsc::UnboundedSender<Message>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| crate::FolioError::Io(format!("draw failed: {e}")))?;

        let Some(message) = rx.recv().await else {
            return Ok(());
        };

        if let Some(action) = update(app, message) {
            dispatch(action, app, api, config, tx);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Executes an action by spawning the request it stands for.
fn dispatch(
    action: Action,
    app: &mut App,
    api: &ApiClient,
    config: &AppConfig,
    tx: &mpsc::UnboundedSender<Message>,
) {
    match action {
        Action::Signup(request) => {
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = api.signup(&request).await.map_err(|e| e.to_string());
                let _ = tx.send(Message::SignupDone(result));
            });
        }

        Action::Login(request) => {
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = api.login(&request).await.map_err(|e| e.to_string());
                let _ = tx.send(Message::LoginDone(result));
            });
        }

        Action::FetchPortfolio => {
            let Some(token) = app.session.token() else {
                return;
            };
            {
                let api = api.clone();
                let tx = tx.clone();
                let token = token.clone();
                tokio::spawn(async move {
                    let result = api.holdings(&token).await.map_err(|e| e.to_string());
                    let _ = tx.send(Message::HoldingsLoaded(result));
                });
            }
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = api.transactions(&token).await.map_err(|e| e.to_string());
                let _ = tx.send(Message::TransactionsLoaded(result));
            });
        }

        Action::AddTransaction(new_tx) => {
            let Some(token) = app.session.token() else {
                app.tx_pending = false;
                return;
            };
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let symbol = new_tx.symbol.clone();
                let result = api
                    .add_transaction(&token, &new_tx)
                    .await
                    .map(|()| symbol)
                    .map_err(|e| e.to_string());
                let _ = tx.send(Message::TransactionAdded(result));
            });
        }

        Action::FetchPrice(symbol) => {
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = api.price(&symbol).await.map_err(|e| e.to_string());
                let _ = tx.send(Message::PriceLoaded(result));
            });
        }

        Action::FetchRiskTrend => {
            let api = api.clone();
            let tx = tx.clone();
            let user_id = config.feed.user_id;
            tokio::spawn(async move {
                let result = api.risk_history(user_id).await.map_err(|e| e.to_string());
                let _ = tx.send(Message::RiskTrendLoaded(result));
            });
        }

        Action::StartFeed => {
            // One controller at a time; the handle lives with the app state.
            if app.feed.is_none() {
                app.feed = Some(LiveFeedController::spawn(
                    &config.feed,
                    api.clone(),
                    tx.clone(),
                ));
            }
        }
    }
}
