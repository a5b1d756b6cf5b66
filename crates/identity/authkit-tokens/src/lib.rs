//! Issuance and verification of signed, time-bound access and refresh tokens.
//!
//! The two token kinds are signed with independent secrets so that a
//! compromised refresh secret cannot forge access tokens and vice versa.
//! The `type` claim is carried as a redundant cross-kind check on top of
//! the secret selection.

use authkit_core::{AuthError, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token")]
    Malformed,

    #[error("Token kind does not match")]
    WrongKind,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::InvalidToken
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// The signed claim set.
///
/// `role` appears on access tokens only; refresh tokens carry the bare
/// subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

/// Process-wide token configuration: set once at startup, read-only after.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: "change-me-in-production".to_string(),
            refresh_secret: "change-me-refresh-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }
}

/// Stateless token mint and verifier.
///
/// Holds only the two secrets, the algorithm, and the two TTLs.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    pub fn issue_access(&self, subject: &str, role: Option<Role>) -> Result<String, TokenError> {
        self.issue(subject, role, TokenKind::Access, self.config.access_ttl)
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, None, TokenKind::Refresh, self.config.refresh_ttl)
    }

    /// Verify a token as the caller-declared kind.
    ///
    /// The secret is selected by `expected`, so a token of the other kind
    /// fails with [`TokenError::InvalidSignature`]; if the secrets happen
    /// to coincide, the `type` claim still rejects it with
    /// [`TokenError::WrongKind`].
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.config.algorithm);
        // Exact expiry boundary; the default 60s leeway would let freshly
        // expired tokens through.
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(expected)),
            &validation,
        )?;

        if data.claims.kind != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(data.claims)
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.config.access_secret.as_bytes(),
            TokenKind::Refresh => self.config.refresh_secret.as_bytes(),
        }
    }

    fn issue(
        &self,
        subject: &str,
        role: Option<Role>,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::new(self.config.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )?)
    }
}
