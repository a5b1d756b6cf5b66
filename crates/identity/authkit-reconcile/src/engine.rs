//! The find-or-create state machine binding external identities to users.

use authkit_core::{
    AuthError, AuthResult, ExternalIdentity, IdentityStore, NewUser, Role, StoreError, User,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Terminal outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The identity was already linked; the common fast path for
    /// returning users.
    AlreadyLinked,
    /// A local account with the identity's email existed and was linked
    /// to it. This is how a password account and an OAuth identity
    /// converge onto one user.
    LinkedExistingUser,
    /// No local account matched; one was created and linked.
    LinkedNewUser,
}

/// Maps each external identity onto exactly one local user.
#[derive(Clone)]
pub struct ReconcileEngine {
    store: Arc<dyn IdentityStore>,
}

impl ReconcileEngine {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Find or create the user and link for a verified external identity.
    ///
    /// The lookup order matters: link first, then email, then create.
    /// The store's uniqueness constraints are the authority under
    /// concurrent callbacks for the same identity; both creation steps
    /// treat a uniqueness violation as "another request got there first"
    /// and re-resolve instead of failing.
    pub async fn resolve(
        &self,
        identity: &ExternalIdentity,
    ) -> AuthResult<(User, Reconciliation)> {
        if let Some(link) = self
            .store
            .find_link(identity.provider, &identity.provider_user_id)
            .await?
        {
            let user = self.user_by_id(link.user_id).await?;
            debug!(user = %user.id, provider = %identity.provider, "external identity already linked");
            return Ok((user, Reconciliation::AlreadyLinked));
        }

        let (user, outcome) = match self.store.find_user_by_email(&identity.email).await? {
            Some(user) => (user, Reconciliation::LinkedExistingUser),
            None => match self
                .store
                .create_user(NewUser {
                    email: identity.email.clone(),
                    name: identity.display_name.clone(),
                    password_hash: None,
                    role: Role::User,
                })
                .await
            {
                Ok(user) => (user, Reconciliation::LinkedNewUser),
                // A concurrent first login won the insert; reuse its user.
                Err(StoreError::DuplicateEmail) => {
                    let user = self
                        .store
                        .find_user_by_email(&identity.email)
                        .await?
                        .ok_or_else(|| {
                            AuthError::Internal("duplicate email with no user record".to_string())
                        })?;
                    (user, Reconciliation::LinkedExistingUser)
                }
                Err(err) => return Err(err.into()),
            },
        };

        match self
            .store
            .create_link(user.id, identity.provider, &identity.provider_user_id)
            .await
        {
            Ok(_) => {
                info!(
                    user = %user.id,
                    provider = %identity.provider,
                    outcome = ?outcome,
                    "linked external identity"
                );
                Ok((user, outcome))
            }
            // Duplicate callback delivery; follow the link the winner made.
            Err(StoreError::DuplicateLink) => {
                let link = self
                    .store
                    .find_link(identity.provider, &identity.provider_user_id)
                    .await?
                    .ok_or_else(|| {
                        AuthError::Internal("duplicate link with no link record".to_string())
                    })?;
                let user = self.user_by_id(link.user_id).await?;
                Ok((user, Reconciliation::AlreadyLinked))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn user_by_id(&self, id: Uuid) -> AuthResult<User> {
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AuthError::Internal("provider link without owning user".to_string()))
    }
}
