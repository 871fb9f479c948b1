//! Shared UI components.

pub mod status_bar;
pub mod tab_bar;
