//! Async driver for the live risk feed.
//!
//! [`LiveFeedController`] owns the single active acquisition resource: the
//! WebSocket stream when pushing, the interval timer when polling. All
//! decisions live in the [`FeedMachine`]; this task only executes its
//! effects and forwards its updates to the central message channel.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{info, warn};
use tungstenite::Message as WsMessage;

use crate::api::ApiClient;
use crate::config::FeedConfig;
use crate::feed::machine::{Effect, FeedMachine};
use crate::tui::Message;

/// The analytics stream connection.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Commands sent from the view layer to the controller task.
enum FeedCommand {
    /// Tear down both channels and exit.
    Stop,
}

/// Handle held by the view layer to stop a running feed.
pub struct FeedHandle {
    cmd_tx: mpsc::UnboundedSender<FeedCommand>,
}

impl FeedHandle {
    /// Requests teardown. Idempotent; safe to call after the task exited.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(FeedCommand::Stop);
    }
}

/// Drives the dual-channel risk feed for one subscription target.
pub struct LiveFeedController {
    stream_url: String,
    api: ApiClient,
    user_id: u64,
    poll_interval: Duration,
    machine: FeedMachine,
    tx: mpsc::UnboundedSender<Message>,
    cmd_rx: mpsc::UnboundedReceiver<FeedCommand>,
}

impl LiveFeedController {
    /// Spawns a feed task for the configured target and returns its handle.
    ///
    /// Returns immediately; all effects are asynchronous and observed as
    /// [`Message::Feed`] updates on `tx`.
    pub fn spawn(
        config: &FeedConfig,
        api: ApiClient,
        tx: mpsc::UnboundedSender<Message>,
    ) -> FeedHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let controller = Self {
            stream_url: config.stream_url.clone(),
            api,
            user_id: config.user_id,
            poll_interval: config.poll_interval,
            machine: FeedMachine::new(),
            tx,
            cmd_rx,
        };
        tokio::spawn(controller.run());
        FeedHandle { cmd_tx }
    }

    /// Runs the feed until stopped or until the view layer goes away.
    async fn run(mut self) {
        let mut ws: Option<WsStream> = None;
        let mut fallback: Option<tokio::time::Interval> = None;

        // Announce the Connecting state before the open attempt.
        if !self.forward_updates() {
            return;
        }

        info!(url = %self.stream_url, "Opening risk stream");
        let effects = match connect_async(&self.stream_url).await {
            Ok((stream, _)) => {
                ws = Some(stream);
                self.machine.on_push_open()
            }
            Err(e) => {
                warn!("Risk stream open failed: {e}");
                self.machine.on_push_open_failed(&e.to_string())
            }
        };
        apply_effects(&effects, &mut ws, &mut fallback, self.poll_interval).await;

        loop {
            if !self.forward_updates() {
                return;
            }
            if self.machine.state() == crate::feed::ConnectionState::Stopped {
                info!("Feed controller stopped");
                return;
            }

            let effects = tokio::select! {
                frame = next_frame(&mut ws) => {
                    match frame {
                        Some(Ok(WsMessage::Text(text))) => self.machine.on_push_message(&text),
                        Some(Ok(WsMessage::Close(_))) | None => {
                            ws = None;
                            self.machine.on_push_closed()
                        }
                        Some(Ok(_)) => Vec::new(), // Binary/Ping/Pong frames
                        Some(Err(e)) => {
                            warn!("Risk stream error: {e}");
                            ws = None;
                            let mut effects = self.machine.on_push_error(&e.to_string());
                            effects.extend(self.machine.on_push_closed());
                            effects
                        }
                    }
                }

                () = next_tick(&mut fallback) => {
                    match self.api.risk_report(self.user_id).await {
                        Ok(report) => self.machine.on_poll_success(report),
                        Err(e) => self.machine.on_poll_error(&e.to_string()),
                    }
                }

                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        // Channel closed means every handle was dropped; treat as stop.
                        Some(FeedCommand::Stop) | None => self.machine.stop(),
                    }
                }
            };

            apply_effects(&effects, &mut ws, &mut fallback, self.poll_interval).await;
        }
    }

    /// Forwards queued machine updates to the view layer.
    ///
    /// Returns `false` if the receiving side is gone (app shutting down).
    fn forward_updates(&mut self) -> bool {
        for update in self.machine.drain_updates() {
            if self.tx.send(Message::Feed(update)).is_err() {
                return false;
            }
        }
        true
    }
}

/// Executes machine effects against the driver-owned resources.
async fn apply_effects(
    effects: &[Effect],
    ws: &mut Option<WsStream>,
    fallback: &mut Option<tokio::time::Interval>,
    poll_interval: Duration,
) {
    for effect in effects {
        match effect {
            Effect::StartFallback => {
                let mut interval = tokio::time::interval(poll_interval);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                *fallback = Some(interval);
            }
            Effect::CancelFallback => {
                *fallback = None;
            }
            Effect::ClosePush => {
                if let Some(mut stream) = ws.take() {
                    let _ = stream.close(None).await;
                }
            }
        }
    }
}

/// Reads the next stream frame, or parks forever while no stream is open.
async fn next_frame(
    ws: &mut Option<WsStream>,
) -> Option<std::result::Result<WsMessage, tungstenite::Error>> {
    match ws.as_mut() {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// Waits for the next poll tick, or parks forever while polling is off.
async fn next_tick(fallback: &mut Option<tokio::time::Interval>) {
    match fallback.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
