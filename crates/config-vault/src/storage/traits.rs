//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Host-provided string key-value store
///
/// Values handed to it by the credential store are already encrypted
/// envelopes, so backends need not add their own encryption.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing whatever was there
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value by key; deleting a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
