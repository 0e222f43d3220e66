use async_trait::async_trait;

use crate::application::errors::StoreError;

/// KvStore trait - abstraction for the durable key-value store.
///
/// Absence of a key is a normal outcome (`None` / `false`), never an error.
/// `increment` is atomic at the store: callers must not emulate it with a
/// get/set pair.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Unconditional overwrite.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Returns whether the key was present.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Increment the integer counter at `key`, initializing an absent key to
    /// zero first, and return the new value. A value that does not parse as
    /// an integer is a `StoreError::NotCounter`.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;
}
