//! Core data model, error taxonomy, and store contract for the authkit stack.

mod error;
mod model;
mod store;

pub use error::{AuthError, AuthResult};
pub use model::{ExternalIdentity, Provider, ProviderLink, Role, UnknownProvider, User};
pub use store::{IdentityStore, NewUser, StoreError};
