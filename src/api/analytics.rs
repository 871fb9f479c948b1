//! Analytics service endpoints.
//!
//! The same risk snapshot shape is also delivered as JSON frames on the
//! analytics WebSocket stream; [`ApiClient::risk_report`] is the pull
//! counterpart used by the feed's fallback poller.

use super::ApiClient;
use crate::Result;
use crate::models::{RiskHistoryPoint, RiskReport};

impl ApiClient {
    /// Fetches the latest risk snapshot via `GET /analytics/risk/{userId}`.
    pub async fn risk_report(&self, user_id: u64) -> Result<RiskReport> {
        let url = format!("{}/analytics/risk/{user_id}", self.gateway_url);
        let response = self.http.get(&url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetches the exposure trend via `GET /analytics/history/{userId}`.
    pub async fn risk_history(&self, user_id: u64) -> Result<Vec<RiskHistoryPoint>> {
        let url = format!("{}/analytics/history/{user_id}", self.gateway_url);
        let response = self.http.get(&url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
