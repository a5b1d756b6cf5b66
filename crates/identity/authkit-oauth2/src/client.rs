//! Shared HTTP plumbing for the provider exchanges.

use crate::config::ExchangeConfig;
use crate::error::{OAuth2Error, OAuth2Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::error;

/// Thin wrapper over the HTTP client used by every provider: a form POST
/// for the authorization-code grant and a bearer GET for profile
/// resources, with non-2xx responses mapped to typed failures.
#[derive(Clone)]
pub struct ExchangeClient {
    http: Client,
}

impl ExchangeClient {
    pub fn new(config: &ExchangeConfig) -> Self {
        let http = Client::builder()
            .timeout(config.http_timeout)
            // GitHub rejects API calls without a User-Agent.
            .user_agent(concat!("authkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// POST the authorization-code grant and decode the token payload.
    pub async fn token_post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> OAuth2Result<T> {
        let response = self
            .http
            .post(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("token exchange failed: {}", body);
            return Err(OAuth2Error::ExchangeFailed(body));
        }

        response
            .json()
            .await
            .map_err(|e| OAuth2Error::ExchangeFailed(e.to_string()))
    }

    /// GET a profile resource using the provider-issued access token.
    pub async fn profile_get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        access_token: &str,
    ) -> OAuth2Result<T> {
        let response = self
            .http
            .get(endpoint)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("profile fetch failed: {}", body);
            return Err(OAuth2Error::ProfileFetchFailed(body));
        }

        response
            .json()
            .await
            .map_err(|e| OAuth2Error::ProfileFetchFailed(e.to_string()))
    }
}
