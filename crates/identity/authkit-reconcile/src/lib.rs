//! Reconciliation of verified external identities onto local user records.
//!
//! Given an [`ExternalIdentity`](authkit_core::ExternalIdentity) the engine
//! finds or creates the local user and the provider link, idempotently:
//! however many times the same identity arrives, and however concurrently,
//! there is exactly one user and one link at the end.

mod engine;
mod memory;

pub use engine::{ReconcileEngine, Reconciliation};
pub use memory::InMemoryIdentityStore;
