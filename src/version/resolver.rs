//! Latest version resolution
//!
//! The store keeps a copy of the newest manifest under a well-known key rather
//! than a version pointer. The latest version is therefore the newest version
//! whose own manifest has exactly the same content.

use std::pin::pin;

use futures::StreamExt;
use futures::stream;
use tracing::{debug, info};

use crate::version::error::ResolveError;
use crate::version::id::VersionId;
use crate::version::manifest::{StorageKey, fetch_manifest};
use crate::version::store::ObjectStore;

/// Finds which published version the latest manifest was copied from
pub struct LatestResolver<'a> {
    store: &'a dyn ObjectStore,
    concurrency: usize,
}

impl<'a> LatestResolver<'a> {
    /// Creates a resolver that fetches one manifest at a time
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` version manifests to be fetched ahead of the
    /// one being compared. Results are still consumed in list order, so the
    /// outcome is identical to a sequential scan.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the first version in `versions` (expected newest first) whose
    /// manifest equals the latest manifest.
    ///
    /// A failure to fetch any manifest up to and including the match aborts
    /// the scan with that error.
    pub async fn resolve(&self, versions: &[VersionId]) -> Result<VersionId, ResolveError> {
        let store = self.store;

        let latest = fetch_manifest(store, &StorageKey::latest())
            .await
            .map_err(ResolveError::Latest)?;

        let mut fetches = pin!(
            stream::iter(versions)
                .map(|version| async move {
                    let manifest = fetch_manifest(store, &StorageKey::for_version(version)).await;
                    (version, manifest)
                })
                .buffered(self.concurrency)
        );

        while let Some((version, manifest)) = fetches.next().await {
            let manifest = manifest.map_err(ResolveError::Version)?;

            if manifest == latest {
                info!("Resolved latest version: {}", version);
                return Ok(version.clone());
            }

            debug!("Version {} does not match latest manifest", version);
        }

        Err(ResolveError::NoMatchingVersion)
    }
}
