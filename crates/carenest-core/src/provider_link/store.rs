//! Device-local key/value storage seam.

use crate::error::Result;
use async_trait::async_trait;

/// A simple string key → string value store, such as browser local storage
/// or a JSON file on the device.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
