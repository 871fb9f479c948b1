//! Terminal dashboard for the TradeLens portfolio services.
//!
//! Provides typed models, async clients for the gateway and market-data
//! REST APIs, a dual-channel live risk feed (WebSocket push with polling
//! fallback), and the ratatui views tying them together.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod history;
pub mod models;
pub mod session;
pub mod storage;
pub mod tui;

pub use error::{FolioError, Result};
