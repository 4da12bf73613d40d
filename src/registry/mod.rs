pub mod json;
pub mod table;

use async_trait::async_trait;
use crate::error::Result;

pub use json::JsonAliasStore;
pub use table::{normalize_identity, AliasTable, IdentityRecord, Registration};

/// Trait for alias store implementations.
///
/// A store is the single owner of the alias table: every mutation goes
/// through it, so concurrent registrations are serialized instead of racing
/// on load-modify-persist.
#[async_trait]
pub trait AliasStore: Send + Sync {
    /// Consistent copy of the table, used for one submission's resolution
    async fn snapshot(&self) -> Result<AliasTable>;

    /// Names registered to an identity (empty when unregistered)
    async fn names_for(&self, identity: &str) -> Result<Vec<String>>;

    /// Register a name and persist the table
    async fn register(&self, identity: &str, name: &str) -> Result<Registration>;
}
