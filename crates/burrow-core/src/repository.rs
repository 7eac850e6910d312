use crate::error::Result;
use async_trait::async_trait;

/// A read-only view of a repository.
///
/// This trait provides only the lookup from [`Repository`], for callers
/// that resolve aliases but never create or remove them.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Returns the destination URL stored under `alias`.
    /// Returns `Err(NotFound)` if no record exists for the alias.
    async fn get(&self, alias: &str) -> Result<String>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record and returns the id assigned by the store.
    /// Returns `Err(AliasExists)` if the alias is already taken.
    async fn save(&self, url: &str, alias: &str) -> Result<i64>;

    /// Removes the record for `alias`.
    /// Succeeds whether or not a record existed.
    async fn delete(&self, alias: &str) -> Result<()>;
}
