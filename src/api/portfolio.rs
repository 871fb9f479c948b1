//! Portfolio service endpoints. All of them require a bearer token.

use super::ApiClient;
use crate::Result;
use crate::models::{Holding, NewTransaction, Transaction};

impl ApiClient {
    /// Records a trade via `POST /portfolio/add`.
    pub async fn add_transaction(&self, token: &str, tx: &NewTransaction) -> Result<()> {
        let url = format!("{}/portfolio/add", self.gateway_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(tx)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetches current positions via `GET /portfolio/holdings`.
    pub async fn holdings(&self, token: &str) -> Result<Vec<Holding>> {
        let url = format!("{}/portfolio/holdings", self.gateway_url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetches the trade ledger via `GET /portfolio/transactions`.
    pub async fn transactions(&self, token: &str) -> Result<Vec<Transaction>> {
        let url = format!("{}/portfolio/transactions", self.gateway_url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
