//! GitHub OAuth2 exchange.

use crate::client::ExchangeClient;
use crate::config::{ExchangeConfig, ProviderCredentials};
use crate::error::{OAuth2Error, OAuth2Result};
use crate::provider::OAuth2Provider;
use crate::types::{GitHubEmail, GitHubProfile, TokenExchangeResponse};
use async_trait::async_trait;
use authkit_core::{ExternalIdentity, Provider};
use tracing::debug;

/// GitHub endpoint set, overridable for tests.
#[derive(Debug, Clone)]
pub struct GitHubEndpoints {
    pub authorization: String,
    pub token: String,
    pub user: String,
    pub emails: String,
}

impl Default for GitHubEndpoints {
    fn default() -> Self {
        Self {
            authorization: "https://github.com/login/oauth/authorize".to_string(),
            token: "https://github.com/login/oauth/access_token".to_string(),
            user: "https://api.github.com/user".to_string(),
            emails: "https://api.github.com/user/emails".to_string(),
        }
    }
}

pub struct GitHubProvider {
    credentials: ProviderCredentials,
    endpoints: GitHubEndpoints,
    client: ExchangeClient,
}

impl GitHubProvider {
    pub fn new(credentials: ProviderCredentials, config: &ExchangeConfig) -> Self {
        Self {
            credentials,
            endpoints: GitHubEndpoints::default(),
            client: ExchangeClient::new(config),
        }
    }

    pub fn with_endpoints(mut self, endpoints: GitHubEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[async_trait]
impl OAuth2Provider for GitHubProvider {
    fn provider(&self) -> Provider {
        Provider::Github
    }

    fn authorize_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", &self.credentials.redirect_uri)
            .append_pair("scope", "user:email")
            .finish();

        format!("{}?{}", self.endpoints.authorization, query)
    }

    async fn exchange_code(&self, code: &str) -> OAuth2Result<ExternalIdentity> {
        let token: TokenExchangeResponse = self
            .client
            .token_post(
                &self.endpoints.token,
                &[
                    ("client_id", &self.credentials.client_id),
                    ("client_secret", &self.credentials.client_secret),
                    ("code", code),
                    ("redirect_uri", &self.credentials.redirect_uri),
                ],
            )
            .await?;

        // GitHub answers a bad code with 200 and an error body.
        let access_token = token
            .access_token
            .ok_or_else(|| OAuth2Error::ExchangeFailed("no access token in response".to_string()))?;

        let profile: GitHubProfile = self
            .client
            .profile_get(&self.endpoints.user, &access_token)
            .await?;

        debug!(id = profile.id, login = %profile.login, "fetched github profile");

        let email = match profile.email {
            Some(email) => email,
            None => {
                // The profile only carries a public email; the email list
                // always has the rest. Take the first address that is both
                // primary and verified.
                let emails: Vec<GitHubEmail> = self
                    .client
                    .profile_get(&self.endpoints.emails, &access_token)
                    .await?;

                emails
                    .into_iter()
                    .find(|e| e.primary && e.verified)
                    .map(|e| e.email)
                    .ok_or(OAuth2Error::NoVerifiedEmail)?
            }
        };

        Ok(ExternalIdentity {
            provider: Provider::Github,
            provider_user_id: profile.id.to_string(),
            email,
            display_name: profile.name.unwrap_or(profile.login),
        })
    }
}
