//! Map-backed identity store for tests and single-process use.

use async_trait::async_trait;
use authkit_core::{IdentityStore, NewUser, Provider, ProviderLink, StoreError, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    links: HashMap<(Provider, String), ProviderLink>,
}

/// In-memory implementation of [`IdentityStore`].
///
/// One write guard spans each check-and-insert, so the uniqueness
/// constraints hold atomically under concurrent writers. That property is
/// what the reconciliation engine's race recovery leans on.
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            role: new_user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_user_name(&self, id: Uuid, name: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        let user = tables.users.get_mut(&id).ok_or(StoreError::UserNotFound)?;
        user.name = name.to_string();

        Ok(user.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);

        Ok(users)
    }

    async fn find_link(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<ProviderLink>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .get(&(provider, provider_user_id.to_string()))
            .cloned())
    }

    async fn create_link(
        &self,
        user_id: Uuid,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<ProviderLink, StoreError> {
        let mut tables = self.tables.write().await;

        let key = (provider, provider_user_id.to_string());
        if tables.links.contains_key(&key) {
            return Err(StoreError::DuplicateLink);
        }
        // Links never outlive their user.
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::Backend(
                "link references missing user".to_string(),
            ));
        }

        let link = ProviderLink {
            id: Uuid::new_v4(),
            user_id,
            provider,
            provider_user_id: provider_user_id.to_string(),
        };
        tables.links.insert(key, link.clone());

        Ok(link)
    }
}
