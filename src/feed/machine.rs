//! Connection state machine for the live risk feed.
//!
//! [`FeedMachine`] is pure state: transport events go in, [`Effect`]s for
//! the driver and [`FeedUpdate`]s for observers come out. It enforces the
//! two mutual-exclusion rules of the feed:
//! - at most one fallback timer runs at any time, no matter how often the
//!   stream fails
//! - reaching `Live(Push)` always cancels a running fallback timer
//!
//! Every transition method is a no-op once the machine is stopped, so
//! observers receive nothing after `stop()`.

use std::collections::VecDeque;

use crate::feed::{ConnectionState, ExposurePoint, FeedChannel, FeedUpdate, LogEntry};
use crate::history::BoundedHistory;
use crate::models::RiskReport;

/// Capacity of the diagnostic event log.
pub const EVENT_LOG_CAPACITY: usize = 16;

/// Capacity of the user-visible alert log.
pub const ALERT_LOG_CAPACITY: usize = 10;

/// Capacity of the exposure history behind the Insights chart.
pub const EXPOSURE_HISTORY_CAPACITY: usize = 50;

/// Side effects the driver must execute after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Start the fallback poll timer.
    StartFallback,
    /// Cancel the fallback poll timer.
    CancelFallback,
    /// Close the push channel.
    ClosePush,
}

/// The feed's state machine. See the module docs for the contract.
pub struct FeedMachine {
    state: ConnectionState,
    snapshot: Option<RiskReport>,
    events: BoundedHistory<LogEntry>,
    alerts: BoundedHistory<LogEntry>,
    exposure_history: BoundedHistory<ExposurePoint>,
    fallback_active: bool,
    push_open: bool,
    next_log_id: u64,
    updates: VecDeque<FeedUpdate>,
}

impl FeedMachine {
    /// Creates a machine in the `Connecting` state, as entered by `start()`.
    pub fn new() -> Self {
        let mut machine = Self {
            state: ConnectionState::Connecting,
            snapshot: None,
            events: BoundedHistory::new(EVENT_LOG_CAPACITY),
            alerts: BoundedHistory::new(ALERT_LOG_CAPACITY),
            exposure_history: BoundedHistory::new(EXPOSURE_HISTORY_CAPACITY),
            fallback_active: false,
            push_open: false,
            next_log_id: 0,
            updates: VecDeque::new(),
        };
        machine
            .updates
            .push_back(FeedUpdate::State(machine.state));
        machine
    }

    /// The stream opened successfully.
    pub fn on_push_open(&mut self) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.push_open = true;
        self.log_event("stream connected".to_string());
        self.mark_push_live()
    }

    /// The stream could not be opened (or constructed).
    pub fn on_push_open_failed(&mut self, reason: &str) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.log_alert(format!("stream connect failed: {reason}"));
        self.enter_fallback()
    }

    /// A text frame arrived on the stream.
    ///
    /// JSON risk reports replace the snapshot and extend the exposure
    /// history; anything else is routed to the event log as diagnostic
    /// text. Either way the channel is demonstrably alive, so the state
    /// moves to `Live(Push)` and the fallback timer is canceled.
    pub fn on_push_message(&mut self, text: &str) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.push_open = true;

        match serde_json::from_str::<RiskReport>(text) {
            Ok(report) => {
                self.log_event("stream update".to_string());
                self.record_snapshot(report);
            }
            Err(_) => {
                self.log_event(format!("stream: {text}"));
            }
        }

        self.mark_push_live()
    }

    /// The stream emitted an error event. Transient: logged as an alert,
    /// then the feed degrades to fallback.
    pub fn on_push_error(&mut self, reason: &str) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.set_state(ConnectionState::Error);
        self.log_alert(format!("stream error: {reason}"));
        self.enter_fallback()
    }

    /// The stream closed, normally or abnormally.
    pub fn on_push_closed(&mut self) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.push_open = false;
        self.set_state(ConnectionState::Disconnected);
        self.log_alert("stream closed".to_string());
        self.enter_fallback()
    }

    /// A fallback poll returned a snapshot. Updates data, keeps the state.
    pub fn on_poll_success(&mut self, report: RiskReport) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.log_event("poll update".to_string());
        self.record_snapshot(report);
        Vec::new()
    }

    /// A fallback poll failed. Logged; the polling loop keeps running.
    pub fn on_poll_error(&mut self, reason: &str) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }
        self.log_alert(format!("poll failed: {reason}"));
        Vec::new()
    }

    /// Tears down both channels. Safe to call repeatedly from any state;
    /// only the first call produces effects or updates.
    pub fn stop(&mut self) -> Vec<Effect> {
        if self.stopped() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.push_open {
            self.push_open = false;
            effects.push(Effect::ClosePush);
        }
        if self.fallback_active {
            self.fallback_active = false;
            effects.push(Effect::CancelFallback);
        }
        self.set_state(ConnectionState::Stopped);
        effects
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Latest snapshot, if any was received on either channel.
    pub fn snapshot(&self) -> Option<&RiskReport> {
        self.snapshot.as_ref()
    }

    /// Diagnostic event log, newest first.
    pub fn events(&self) -> &BoundedHistory<LogEntry> {
        &self.events
    }

    /// Alert log, newest first.
    pub fn alerts(&self) -> &BoundedHistory<LogEntry> {
        &self.alerts
    }

    /// Exposure history, newest first.
    pub fn exposure_history(&self) -> &BoundedHistory<ExposurePoint> {
        &self.exposure_history
    }

    /// Whether the fallback timer should currently be running.
    pub fn fallback_active(&self) -> bool {
        self.fallback_active
    }

    /// Whether the push channel is currently open.
    pub fn push_open(&self) -> bool {
        self.push_open
    }

    /// Drains the updates queued by transitions since the last call.
    pub fn drain_updates(&mut self) -> Vec<FeedUpdate> {
        self.updates.drain(..).collect()
    }

    fn stopped(&self) -> bool {
        self.state == ConnectionState::Stopped
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            self.state = state;
            self.updates.push_back(FeedUpdate::State(state));
        }
    }

    /// Enters `Live(Fallback)`, starting the timer only if none is running.
    fn enter_fallback(&mut self) -> Vec<Effect> {
        self.set_state(ConnectionState::Live(FeedChannel::Fallback));
        if self.fallback_active {
            Vec::new()
        } else {
            self.fallback_active = true;
            vec![Effect::StartFallback]
        }
    }

    /// Enters `Live(Push)`, canceling the fallback timer if it is running.
    fn mark_push_live(&mut self) -> Vec<Effect> {
        self.set_state(ConnectionState::Live(FeedChannel::Push));
        if self.fallback_active {
            self.fallback_active = false;
            vec![Effect::CancelFallback]
        } else {
            Vec::new()
        }
    }

    /// Replaces the snapshot wholesale and extends the exposure history.
    fn record_snapshot(&mut self, report: RiskReport) {
        let point = ExposurePoint {
            label: report.last_updated.clone(),
            value: report.total_exposure,
        };
        self.exposure_history.append(point.clone());
        self.updates.push_back(FeedUpdate::History(point));
        self.updates.push_back(FeedUpdate::Snapshot(report.clone()));
        self.snapshot = Some(report);
    }

    fn log_event(&mut self, text: String) {
        let entry = LogEntry {
            id: self.next_log_id,
            text,
        };
        self.next_log_id += 1;
        self.events.append(entry.clone());
        self.updates.push_back(FeedUpdate::Event(entry));
    }

    fn log_alert(&mut self, text: String) {
        let entry = LogEntry {
            id: self.next_log_id,
            text,
        };
        self.next_log_id += 1;
        self.alerts.append(entry.clone());
        self.updates.push_back(FeedUpdate::Alert(entry));
    }
}

impl Default for FeedMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(exposure: f64, updated: &str) -> RiskReport {
        serde_json::from_value(serde_json::json!({
            "userId": 1,
            "positions": {"AAPL": 10},
            "totalExposure": exposure,
            "lastUpdated": updated,
        }))
        .unwrap()
    }

    #[test]
    fn starts_connecting() {
        let mut machine = FeedMachine::new();
        assert_eq!(machine.state(), ConnectionState::Connecting);
        assert!(matches!(
            machine.drain_updates().as_slice(),
            [FeedUpdate::State(ConnectionState::Connecting)]
        ));
    }

    #[test]
    fn open_success_goes_live_push_without_timer() {
        let mut machine = FeedMachine::new();
        let effects = machine.on_push_open();
        assert_eq!(machine.state(), ConnectionState::Live(FeedChannel::Push));
        assert!(effects.is_empty());
        assert!(!machine.fallback_active());
    }

    #[test]
    fn open_failure_starts_exactly_one_timer_and_alerts_once() {
        let mut machine = FeedMachine::new();
        let effects = machine.on_push_open_failed("connection refused");
        assert_eq!(
            machine.state(),
            ConnectionState::Live(FeedChannel::Fallback)
        );
        assert_eq!(effects, vec![Effect::StartFallback]);
        assert_eq!(machine.alerts().len(), 1);
        assert!(
            machine
                .alerts()
                .latest()
                .unwrap()
                .text
                .contains("connect failed")
        );
    }

    #[test]
    fn repeated_failures_never_stack_timers() {
        let mut machine = FeedMachine::new();
        assert_eq!(
            machine.on_push_open_failed("refused"),
            vec![Effect::StartFallback]
        );
        assert!(machine.on_push_error("reset").is_empty());
        assert!(machine.on_push_closed().is_empty());
        assert!(machine.fallback_active());
    }

    #[test]
    fn close_while_push_live_degrades_to_single_timer() {
        let mut machine = FeedMachine::new();
        machine.on_push_open();
        let effects = machine.on_push_closed();
        assert_eq!(
            machine.state(),
            ConnectionState::Live(FeedChannel::Fallback)
        );
        assert_eq!(effects, vec![Effect::StartFallback]);
    }

    #[test]
    fn error_is_transient_then_falls_back() {
        let mut machine = FeedMachine::new();
        machine.on_push_open();
        machine.drain_updates();

        machine.on_push_error("protocol violation");
        let updates = machine.drain_updates();
        // Error state is observable, then immediately superseded by fallback.
        assert!(
            updates
                .iter()
                .any(|u| matches!(u, FeedUpdate::State(ConnectionState::Error)))
        );
        assert_eq!(
            machine.state(),
            ConnectionState::Live(FeedChannel::Fallback)
        );
    }

    #[test]
    fn poll_success_updates_data_but_not_state() {
        let mut machine = FeedMachine::new();
        machine.on_push_open_failed("refused");

        machine.on_poll_success(report(1000.0, "t1"));
        assert_eq!(
            machine.state(),
            ConnectionState::Live(FeedChannel::Fallback)
        );
        assert_eq!(machine.snapshot().unwrap().total_exposure, 1000.0);
        assert_eq!(machine.exposure_history().len(), 1);
    }

    #[test]
    fn push_message_in_fallback_restores_push_and_cancels_timer() {
        let mut machine = FeedMachine::new();
        machine.on_push_open_failed("refused");

        let effects = machine.on_push_message(
            r#"{"userId":1,"positions":{},"totalExposure":2000.0,"lastUpdated":"t2"}"#,
        );
        assert_eq!(machine.state(), ConnectionState::Live(FeedChannel::Push));
        assert_eq!(effects, vec![Effect::CancelFallback]);
        assert!(!machine.fallback_active());
        assert_eq!(machine.snapshot().unwrap().total_exposure, 2000.0);
    }

    #[test]
    fn non_json_frame_goes_to_event_log_not_snapshot() {
        let mut machine = FeedMachine::new();
        machine.on_push_open();
        machine.on_push_message("subscription acknowledged");

        assert!(machine.snapshot().is_none());
        assert!(
            machine
                .events()
                .iter()
                .any(|e| e.text.contains("subscription acknowledged"))
        );
        assert_eq!(machine.state(), ConnectionState::Live(FeedChannel::Push));
    }

    #[test]
    fn poll_error_keeps_polling() {
        let mut machine = FeedMachine::new();
        machine.on_push_open_failed("refused");
        let effects = machine.on_poll_error("timeout");
        assert!(effects.is_empty());
        assert!(machine.fallback_active());
        assert_eq!(machine.alerts().len(), 2);
    }

    #[test]
    fn stop_tears_down_both_channels_and_is_idempotent() {
        let mut machine = FeedMachine::new();
        machine.on_push_open();
        machine.on_push_closed();

        let effects = machine.stop();
        assert_eq!(effects, vec![Effect::CancelFallback]);
        assert_eq!(machine.state(), ConnectionState::Stopped);
        assert!(!machine.fallback_active());
        assert!(!machine.push_open());

        machine.drain_updates();
        assert!(machine.stop().is_empty());
        assert!(machine.on_push_message("late frame").is_empty());
        assert!(machine.drain_updates().is_empty());
    }

    #[test]
    fn stop_while_push_open_closes_channel() {
        let mut machine = FeedMachine::new();
        machine.on_push_open();
        assert_eq!(machine.stop(), vec![Effect::ClosePush]);
    }

    #[test]
    fn log_ids_are_monotonic() {
        let mut machine = FeedMachine::new();
        machine.on_push_open_failed("a");
        machine.on_poll_error("b");
        machine.on_poll_error("c");

        let ids: Vec<u64> = machine.alerts().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }

    #[test]
    fn event_log_is_capped() {
        let mut machine = FeedMachine::new();
        machine.on_push_open();
        for _ in 0..EVENT_LOG_CAPACITY + 10 {
            machine.on_push_message("noise");
        }
        assert_eq!(machine.events().len(), EVENT_LOG_CAPACITY);
    }
}
