//! OAuth2 authorization-code exchange for the supported identity providers.
//!
//! Each provider implements the [`OAuth2Provider`] capability set: a pure
//! authorization-URL builder and the code -> token -> profile exchange that
//! yields a normalized [`ExternalIdentity`]. Providers are swappable behind
//! the trait; the reconciliation side never sees provider specifics.

mod client;
mod config;
mod error;
mod github;
mod google;
mod provider;
mod types;

#[cfg(test)]
mod tests;

pub use client::ExchangeClient;
pub use config::{ExchangeConfig, ProviderCredentials};
pub use error::{OAuth2Error, OAuth2Result};
pub use github::{GitHubEndpoints, GitHubProvider};
pub use google::{GoogleEndpoints, GoogleProvider};
pub use provider::{OAuth2Provider, ProviderRegistry};
pub use types::{GitHubEmail, GitHubProfile, GoogleProfile, TokenExchangeResponse};

// Re-export the types providers produce, for convenience.
pub use authkit_core::{ExternalIdentity, Provider};
