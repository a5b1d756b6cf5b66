//! Google OAuth2 exchange.

use crate::client::ExchangeClient;
use crate::config::{ExchangeConfig, ProviderCredentials};
use crate::error::{OAuth2Error, OAuth2Result};
use crate::provider::OAuth2Provider;
use crate::types::{GoogleProfile, TokenExchangeResponse};
use async_trait::async_trait;
use authkit_core::{ExternalIdentity, Provider};
use tracing::debug;

/// Google endpoint set, overridable for tests.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorization: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorization: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
        }
    }
}

pub struct GoogleProvider {
    credentials: ProviderCredentials,
    endpoints: GoogleEndpoints,
    client: ExchangeClient,
}

impl GoogleProvider {
    pub fn new(credentials: ProviderCredentials, config: &ExchangeConfig) -> Self {
        Self {
            credentials,
            endpoints: GoogleEndpoints::default(),
            client: ExchangeClient::new(config),
        }
    }

    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[async_trait]
impl OAuth2Provider for GoogleProvider {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn authorize_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", &self.credentials.redirect_uri)
            .append_pair("scope", "openid email profile")
            .finish();

        format!("{}?{}", self.endpoints.authorization, query)
    }

    async fn exchange_code(&self, code: &str) -> OAuth2Result<ExternalIdentity> {
        let token: TokenExchangeResponse = self
            .client
            .token_post(
                &self.endpoints.token,
                &[
                    ("code", code),
                    ("client_id", &self.credentials.client_id),
                    ("client_secret", &self.credentials.client_secret),
                    ("redirect_uri", &self.credentials.redirect_uri),
                    ("grant_type", "authorization_code"),
                ],
            )
            .await?;

        let access_token = token
            .access_token
            .ok_or_else(|| OAuth2Error::ExchangeFailed("no access token in response".to_string()))?;

        let profile: GoogleProfile = self
            .client
            .profile_get(&self.endpoints.userinfo, &access_token)
            .await?;

        debug!(sub = %profile.sub, "fetched google profile");

        // The openid/email scopes make the userinfo email verified; an
        // absent one means the exchange cannot identify the account.
        let email = profile.email.ok_or(OAuth2Error::NoVerifiedEmail)?;

        Ok(ExternalIdentity {
            provider: Provider::Google,
            provider_user_id: profile.sub,
            email,
            display_name: profile.name.unwrap_or_else(|| "Google User".to_string()),
        })
    }
}
