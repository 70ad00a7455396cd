//! Object store trait for reading published artifacts

#[cfg(test)]
use mockall::automock;

use crate::version::error::StoreError;

/// Read-only access to the bucket holding published versions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists every object key starting with `prefix`
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - All matching keys across every result page, in store order
    /// * `Err(StoreError)` - If any page request fails
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Fetches the full body of the object at `key`
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError>;
}
