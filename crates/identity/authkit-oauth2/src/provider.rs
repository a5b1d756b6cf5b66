//! The capability set each identity provider implements.

use crate::error::OAuth2Result;
use async_trait::async_trait;
use authkit_core::{ExternalIdentity, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// One implementation per supported provider. Implementations are
/// swappable behind this trait; nothing downstream depends on provider
/// specifics.
#[async_trait]
pub trait OAuth2Provider: Send + Sync {
    /// Which provider this implementation speaks for.
    fn provider(&self) -> Provider;

    /// The authorization endpoint URL the user agent is redirected to.
    /// Pure; performs no I/O.
    fn authorize_url(&self) -> String;

    /// Run the code -> token -> profile exchange and normalize the result.
    async fn exchange_code(&self, code: &str) -> OAuth2Result<ExternalIdentity>;
}

/// Static provider -> implementation mapping, built once at startup.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Provider, Arc<dyn OAuth2Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, provider: Arc<dyn OAuth2Provider>) -> Self {
        self.providers.insert(provider.provider(), provider);
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&Arc<dyn OAuth2Provider>> {
        self.providers.get(&provider)
    }
}
