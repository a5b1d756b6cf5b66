//! Exchange configuration types.
//!
//! All of this is constructed once at process start from whatever config
//! source the embedding service uses, then injected; nothing here reads
//! ambient state.

use std::time::Duration;

/// Client credentials registered with one provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Settings shared by the per-provider exchange clients.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Upper bound on each outbound provider call. Providers give no
    /// latency guarantee, so every call runs under this cap.
    pub http_timeout: Duration,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(10),
        }
    }
}
