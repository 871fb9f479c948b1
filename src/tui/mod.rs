//! Terminal user interface for the folio dashboard.
//!
//! Provides a Ratatui-based TUI with one view per dashboard page
//! (account, dashboard, transactions, market data, insights), driven by a
//! central message loop.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod runner;
pub mod terminal;
pub mod ui;
pub mod views;

pub use app::App;
pub use event::{Action, Event, Message};
pub use runner::run;
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
