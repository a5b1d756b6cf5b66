use thiserror::Error;

use crate::store::StoreError;

/// The failure taxonomy every operation in the core resolves to.
///
/// Unknown-email and wrong-password cases both surface as
/// [`AuthError::InvalidCredentials`] so callers cannot enumerate accounts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("External identity already linked")]
    DuplicateLink,

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Admin privileges required")]
    Forbidden,

    #[error("Code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    #[error("No verified email for external identity")]
    NoVerifiedEmail,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::DuplicateLink => AuthError::DuplicateLink,
            // A token subject that no longer resolves is indistinguishable
            // from a stale token to the caller.
            StoreError::UserNotFound => AuthError::InvalidToken,
            StoreError::Backend(msg) => AuthError::Internal(msg),
        }
    }
}
