//! The operation surface the request-handling layer drives.
//!
//! Each operation is an independent unit of work; nothing here holds
//! mutable state across requests beyond the read-only token configuration
//! and the startup-built provider registry. HTTP status mapping, rate
//! limiting, and store acquisition all live with the caller.

use authkit_core::{AuthError, AuthResult, IdentityStore, NewUser, Provider, Role, User};
use authkit_credentials::{CredentialHasher, DUMMY_HASH};
use authkit_oauth2::{OAuth2Provider, ProviderRegistry};
use authkit_reconcile::ReconcileEngine;
use authkit_tokens::{TokenKind, TokenService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;


/// Registration input for a local account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The credential pair minted on login and on an OAuth callback.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    hasher: CredentialHasher,
    tokens: TokenService,
    engine: ReconcileEngine,
    providers: ProviderRegistry,
}

impl AuthService {
    pub fn new(store: Arc<dyn IdentityStore>, tokens: TokenService) -> Self {
        Self {
            engine: ReconcileEngine::new(Arc::clone(&store)),
            hasher: CredentialHasher::new(),
            providers: ProviderRegistry::new(),
            store,
            tokens,
        }
    }

    /// Register an OAuth2 provider implementation.
    pub fn with_provider(mut self, provider: Arc<dyn OAuth2Provider>) -> Self {
        self.providers = self.providers.register(provider);
        self
    }

    /// Create a local password account. New accounts always get the
    /// `user` role.
    pub async fn register(&self, registration: NewRegistration) -> AuthResult<User> {
        let password_hash = self
            .hasher
            .hash(&registration.password)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = self
            .store
            .create_user(NewUser {
                email: registration.email,
                name: registration.name,
                password_hash: Some(password_hash),
                role: Role::User,
            })
            .await?;

        info!(user = %user.id, "registered local account");
        Ok(user)
    }

    /// Local password login.
    ///
    /// Unknown email, OAuth-only account, and wrong password all fail
    /// with the same error, and the first two burn a hash verification
    /// against a dummy hash so they cost the same as the third.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let user = self.store.find_user_by_email(email).await?;

        let valid = match user.as_ref().and_then(|u| u.password_hash.as_deref()) {
            Some(hash) => self.hasher.verify(password, Some(hash)).await,
            None => {
                self.hasher.verify(password, Some(DUMMY_HASH)).await;
                false
            }
        };

        match user {
            Some(user) if valid => self.token_pair(&user),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Trade a refresh token for a new access token. The new token
    /// carries the bare subject; callers that need the role resolve the
    /// user through [`AuthService::current_user`].
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        Ok(self.tokens.issue_access(&claims.sub, None)?)
    }

    /// Resolve the caller from an access token.
    pub async fn current_user(&self, access_token: &str) -> AuthResult<User> {
        let claims = self.tokens.verify(access_token, TokenKind::Access)?;
        self.store
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Update the caller's display name.
    pub async fn update_current_name(
        &self,
        access_token: &str,
        name: &str,
    ) -> AuthResult<User> {
        let user = self.current_user(access_token).await?;
        Ok(self.store.update_user_name(user.id, name).await?)
    }

    /// List all users. Admin only; the role is checked against the stored
    /// record, not the token claim.
    pub async fn list_users(&self, access_token: &str) -> AuthResult<Vec<User>> {
        let caller = self.current_user(access_token).await?;
        if !caller.role.is_admin() {
            return Err(AuthError::Forbidden);
        }
        Ok(self.store.list_users().await?)
    }

    /// The authorization URL to redirect the user agent to.
    pub fn authorize_url(&self, provider: Provider) -> AuthResult<String> {
        Ok(self.provider_impl(provider)?.authorize_url())
    }

    /// Complete a provider callback: exchange the code, reconcile the
    /// identity onto a local user, and mint a token pair for it.
    pub async fn oauth_callback(
        &self,
        provider: Provider,
        code: &str,
    ) -> AuthResult<TokenPair> {
        let identity = self.provider_impl(provider)?.exchange_code(code).await?;
        let (user, outcome) = self.engine.resolve(&identity).await?;

        info!(user = %user.id, provider = %provider, outcome = ?outcome, "completed oauth login");
        self.token_pair(&user)
    }

    fn provider_impl(&self, provider: Provider) -> AuthResult<&Arc<dyn OAuth2Provider>> {
        self.providers
            .get(provider)
            .ok_or_else(|| AuthError::ProviderNotFound(provider.to_string()))
    }

    fn token_pair(&self, user: &User) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.tokens.issue_access(&user.email, Some(user.role))?,
            refresh_token: self.tokens.issue_refresh(&user.email)?,
        })
    }
}
