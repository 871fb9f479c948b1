//! Live risk feed: push stream with polling fallback.
//!
//! This module is organized in two layers:
//! - [`machine`] - the connection state machine, free of any IO, which owns
//!   the snapshot, logs, and exposure history and decides when the fallback
//!   poller starts and stops
//! - [`controller`] - the async driver that owns the actual WebSocket and
//!   fallback timer and feeds transport events into the machine
//!
//! The split keeps the invariant "push and pull are never simultaneously
//! active" checkable in plain unit tests.

pub mod controller;
pub mod machine;

use serde::{Deserialize, Serialize};

use crate::models::RiskReport;

pub use controller::{FeedHandle, LiveFeedController};
pub use machine::{Effect, FeedMachine};

/// Which acquisition channel is currently delivering data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedChannel {
    /// The WebSocket stream.
    Push,
    /// The interval poller.
    Fallback,
}

/// Connection state of the live feed. Exactly one is current at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// `start()` was called; the stream open is in flight.
    Connecting,
    /// Data is flowing over the given channel.
    Live(FeedChannel),
    /// The stream emitted an error; transient, degrades to fallback.
    Error,
    /// The stream closed; degrades to fallback.
    Disconnected,
    /// `stop()` was called; terminal until the next start.
    Stopped,
}

impl ConnectionState {
    /// Returns a display string for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Live(FeedChannel::Push) => "Live",
            ConnectionState::Live(FeedChannel::Fallback) => "Polling",
            ConnectionState::Error => "Stream Error",
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Stopped => "Stopped",
        }
    }
}

/// A diagnostic line in the event or alert log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic id, unique within one feed run.
    pub id: u64,
    pub text: String,
}

/// One point of the exposure trend drawn in the Insights chart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExposurePoint {
    /// Snapshot timestamp, used as the axis label.
    pub label: String,
    pub value: f64,
}

/// Observable output of the feed, forwarded to the view layer.
#[derive(Clone, Debug)]
pub enum FeedUpdate {
    /// The connection state changed.
    State(ConnectionState),
    /// A fresh snapshot replaced the previous one.
    Snapshot(RiskReport),
    /// A line was appended to the event log.
    Event(LogEntry),
    /// A line was appended to the alert log.
    Alert(LogEntry),
    /// A point was appended to the exposure history.
    History(ExposurePoint),
}
