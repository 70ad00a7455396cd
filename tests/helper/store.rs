//! Store test utilities

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use metavisor_cli::version::error::StoreError;
use metavisor_cli::version::store::ObjectStore;

/// In-memory object store for testing
#[derive(Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
    failing_keys: HashSet<String>,
    fail_listing: bool,
    fetched: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, key: &str, body: &str) -> Self {
        self.objects.insert(key.to_string(), body.as_bytes().to_vec());
        self
    }

    /// Makes `get_object` fail with a transport-style error for `key`
    pub fn with_failing_key(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Keys passed to `get_object`, in call order
    pub fn fetched_keys(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        if self.fail_listing {
            return Err(StoreError::InvalidResponse(
                "Unexpected status: 500 Internal Server Error".to_string(),
            ));
        }

        Ok(self
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.fetched.lock().unwrap().push(key.to_string());

        if self.failing_keys.contains(key) {
            return Err(StoreError::InvalidResponse(format!(
                "Connection reset while fetching {}",
                key
            )));
        }

        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
