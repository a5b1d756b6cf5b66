//! One-way password hashing and verification for local login.
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool and a
//! small semaphore caps how many hashes execute at once. Callers hold no
//! store connection or lock while a hash runs.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

/// A real Argon2 hash of an unused filler password. Verifying against it
/// when an account is missing or has no password hash costs the same as a
/// wrong-password check, which keeps login timing uniform.
pub const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$9QsJRKgzJkKaOUvlp7gl2Q$qmE3qIFBNJ6nZYbLYXEI2uo0zZc7T0Q8LU1ZsqsZ3QE";

const MAX_CONCURRENT_HASHES: usize = 5;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] argon2::password_hash::Error),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Salted Argon2 hashing with self-contained verification.
///
/// The PHC output string embeds the salt and cost parameters, so `verify`
/// needs nothing beyond the stored hash.
#[derive(Clone)]
pub struct CredentialHasher {
    semaphore: Arc<Semaphore>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_HASHES)),
        }
    }

    pub async fn hash(&self, password: &str) -> Result<String, HashError> {
        let _permit = self.semaphore.clone().acquire_owned().await.unwrap();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
            Ok(hash.to_string())
        })
        .await?
    }

    /// Check a password against a stored hash.
    ///
    /// Returns `false` for an absent hash (the OAuth-only-account case)
    /// and for a hash that does not parse; it never fails.
    pub async fn verify(&self, password: &str, hash: Option<&str>) -> bool {
        let Some(hash) = hash else {
            return false;
        };

        let _permit = self.semaphore.clone().acquire_owned().await.unwrap();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&hash) else {
                return false;
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}
