use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The single role flag carried by every account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A supported external identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Github,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Github => "github",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl std::str::FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "github" => Ok(Provider::Github),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// A local account.
///
/// `password_hash` is absent for OAuth-only accounts and is never
/// serialized, so a `User` can be handed to the presentation layer as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Binds one local user to one external identity.
///
/// The pair `(provider, provider_user_id)` is unique: at most one link per
/// external identity, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: Provider,
    pub provider_user_id: String,
}

/// The normalized result of an OAuth2 exchange.
///
/// Transient: produced by the exchange client, consumed by the
/// reconciliation engine, never persisted. The email is always resolved by
/// the time one of these exists; an exchange that cannot resolve one fails
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub provider: Provider,
    pub provider_user_id: String,
    pub email: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password_hash: Some("$argon2id$not-a-real-hash".to_string()),
            name: "A".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "a@x.com");
        assert_eq!(value["role"], "user");
    }

    #[test]
    fn provider_round_trips_through_str() {
        for provider in [Provider::Google, Provider::Github] {
            assert_eq!(provider.to_string().parse::<Provider>(), Ok(provider));
        }
        assert!("gitlab".parse::<Provider>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
    }
}
