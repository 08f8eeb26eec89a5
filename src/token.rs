//! Token-refresh collaborator.
//!
//! Exchanges the long-lived refresh token for a short-lived access token
//! against the storage provider's OAuth endpoint. The orchestrator treats a
//! failure here as a degraded condition, never a fatal one.

use async_trait::async_trait;
use serde::Deserialize;

use crate::credentials::CredentialRecord;
use crate::error::{Error, Result};

/// A short-lived access token returned by the refresh endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// Seconds until expiry, when the endpoint reports one.
    pub expires_in: Option<u64>,
}

/// Seam for the OAuth refresh call, so the pipeline can be exercised
/// without a network.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, record: &CredentialRecord) -> Result<AccessToken>;
}

/// Refresher backed by the Dropbox OAuth2 token endpoint.
pub struct DropboxTokenRefresher {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

impl DropboxTokenRefresher {
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TokenRefresher for DropboxTokenRefresher {
    async fn refresh(&self, record: &CredentialRecord) -> Result<AccessToken> {
        if record.refresh_token.is_empty() {
            return Err(Error::TokenRefresh(
                "no refresh token configured".to_string(),
            ));
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", record.refresh_token.as_str()),
            ("client_id", record.app_key.as_str()),
            ("client_secret", record.app_secret.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::TokenRefresh(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable body".to_string());
            return Err(Error::TokenRefresh(format!("{status}: {body}")));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::TokenRefresh(e.to_string()))?;

        Ok(AccessToken {
            token: parsed.access_token,
            expires_in: parsed.expires_in,
        })
    }
}
