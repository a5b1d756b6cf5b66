//! OAuth2 exchange error types.

use authkit_core::AuthError;
use thiserror::Error;

pub type OAuth2Result<T> = Result<T, OAuth2Error>;

#[derive(Debug, Error)]
pub enum OAuth2Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    #[error("No verified email for external identity")]
    NoVerifiedEmail,
}

impl From<OAuth2Error> for AuthError {
    fn from(err: OAuth2Error) -> Self {
        match err {
            OAuth2Error::ExchangeFailed(msg) => AuthError::ExchangeFailed(msg),
            OAuth2Error::ProfileFetchFailed(msg) => AuthError::ProfileFetchFailed(msg),
            OAuth2Error::NoVerifiedEmail => AuthError::NoVerifiedEmail,
            // Transport failures are not distinguished from provider-side
            // logical failures at this boundary.
            OAuth2Error::Http(err) => AuthError::ExchangeFailed(err.to_string()),
        }
    }
}
