//! Market-data service endpoints.

use super::ApiClient;
use crate::Result;
use crate::models::PriceQuote;

impl ApiClient {
    /// Fetches the latest quote via `GET /marketdata/price/{symbol}`.
    pub async fn price(&self, symbol: &str) -> Result<PriceQuote> {
        let url = format!("{}/marketdata/price/{symbol}", self.market_data_url);
        let response = self.http.get(&url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
