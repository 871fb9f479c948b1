//! Auth service endpoints.

use tracing::info;

use super::ApiClient;
use crate::Result;
use crate::models::{LoginRequest, LoginResponse, SignupRequest};

impl ApiClient {
    /// Registers a new account via `POST /auth/signup`.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Api`](crate::FolioError::Api) on a rejected
    /// signup (e.g. duplicate email) or a transport error.
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let url = format!("{}/auth/signup", self.gateway_url);
        let response = self.http.post(&url).json(request).send().await?;
        Self::check(response).await?;
        info!(email = %request.email, "Account registered");
        Ok(())
    }

    /// Exchanges credentials for a bearer token via `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Api`](crate::FolioError::Api) on bad
    /// credentials or a transport error.
    pub async fn login(&self, request: &LoginRequest) -> Result<String> {
        let url = format!("{}/auth/login", self.gateway_url);
        let response = self.http.post(&url).json(request).send().await?;
        let body: LoginResponse = Self::check(response).await?.json().await?;
        info!("Login succeeded");
        Ok(body.token)
    }

    /// Probes `GET /auth/health`.
    pub async fn auth_health(&self) -> Result<()> {
        let url = format!("{}/auth/health", self.gateway_url);
        let response = self.http.get(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
