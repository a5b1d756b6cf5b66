use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Provider, ProviderLink, Role, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("External identity already linked")]
    DuplicateLink,

    #[error("User not found")]
    UserNotFound,

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Fields for a user record about to be created.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub role: Role,
}

/// Persistence contract for user and provider-link records.
///
/// The backing technology is out of scope; implementations must enforce
/// the email and `(provider, provider_user_id)` uniqueness constraints
/// atomically at write time. Callers' check-then-act sequences are
/// optimizations layered on top of that guarantee, never a substitute
/// for it.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<User, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_link(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<ProviderLink>, StoreError>;

    /// Fails with [`StoreError::DuplicateLink`] when the external identity
    /// is already linked.
    async fn create_link(
        &self,
        user_id: Uuid,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<ProviderLink, StoreError>;
}
