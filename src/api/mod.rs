//! HTTP clients for the remote services.
//!
//! This module is organized by service:
//! - [`auth`] - signup, login, health check
//! - [`portfolio`] - holdings and the transaction ledger (bearer-gated)
//! - [`market`] - price quotes
//! - [`analytics`] - risk snapshots and exposure history
//!
//! Every call catches its own transport failures at the call site; nothing
//! here retries or escalates. A failed request surfaces as an error scoped
//! to the view that issued it.

mod analytics;
mod auth;
mod market;
mod portfolio;

use crate::Result;
use crate::config::ServiceConfig;

/// Shared client for all remote services.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    gateway_url: String,
    market_data_url: String,
}

impl ApiClient {
    /// Creates a client targeting the configured service base URLs.
    #[must_use]
    pub fn new(services: &ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway_url: services.gateway_url.trim_end_matches('/').to_string(),
            market_data_url: services.market_data_url.trim_end_matches('/').to_string(),
        }
    }

    /// Maps a non-success response to [`FolioError::Api`](crate::FolioError::Api)
    /// carrying the status and response body.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(crate::FolioError::Api(format!("{status}: {body}")))
    }
}
