use std::time::Duration;

use async_trait::async_trait;
use dealer_core::{AuthError, Identity, TokenVerifier};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ClientError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for the auth service's `POST /api/auth/verify`.
#[derive(Clone)]
pub struct AuthClientHttp {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user: Identity,
}

impl AuthClientHttp {
    /// Every request is bounded by `timeout`, connect phase included.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(endpoint.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One attempt, no retry. Anything but a 2xx carrying `{user:{id,role}}`
    /// is an error.
    pub async fn verify_token(&self, token: &str) -> Result<Identity, ClientError> {
        let resp = self
            .client
            .post(format!("{}/api/auth/verify", self.base_url))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(resp.status()));
        }

        let body = resp.bytes().await?;
        let parsed: VerifyResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(parsed.user)
    }
}

#[async_trait]
impl TokenVerifier for AuthClientHttp {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        match self.verify_token(token).await {
            Ok(identity) => {
                debug!(user_id = %identity.id, "token verified by auth service");
                Ok(identity)
            }
            Err(ClientError::Rejected(status)) => {
                debug!(%status, "auth service rejected token");
                Err(AuthError::InvalidToken)
            }
            Err(err) => {
                // fail closed: transport and protocol faults deny the request
                warn!(error = %err, timeout = err.is_timeout(), "token verification failed");
                Err(AuthError::InvalidToken)
            }
        }
    }
}
