//! Version catalog assembly

use serde::Serialize;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::version::error::{CatalogError, ManifestError};
use crate::version::id::VersionId;
use crate::version::lister::list_versions;
use crate::version::manifest::{Manifest, StorageKey, fetch_manifest};
use crate::version::resolver::LatestResolver;
use crate::version::store::ObjectStore;

/// Published versions plus the one currently tagged latest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionCatalog {
    /// Raw identifier of the latest version, empty when it could not be resolved
    #[serde(rename = "latest_mv_version")]
    pub latest: String,
    /// Raw identifiers, newest first, without duplicates
    #[serde(rename = "mv_versions")]
    pub versions: Vec<String>,
}

impl VersionCatalog {
    pub fn latest(&self) -> Option<&str> {
        (!self.latest.is_empty()).then_some(self.latest.as_str())
    }

    pub fn is_latest(&self, version: &str) -> bool {
        self.latest() == Some(version)
    }
}

/// Builds the catalog for the bucket described by `config`.
///
/// Listing failures are returned. Failing to resolve the latest version is
/// logged and leaves `latest` empty.
pub async fn build_catalog(
    store: &dyn ObjectStore,
    config: &StoreConfig,
) -> Result<VersionCatalog, CatalogError> {
    let versions = list_versions(store, &config.prefix).await?;
    info!("Found {} published versions", versions.len());

    let latest = LatestResolver::new(store)
        .with_concurrency(config.resolve_concurrency)
        .resolve(&versions)
        .await
        .map(|v| v.as_str().to_string())
        .unwrap_or_else(|e| {
            warn!("Could not determine latest version: {}", e);
            String::new()
        });

    Ok(VersionCatalog {
        latest,
        versions: versions.iter().map(|v| v.as_str().to_string()).collect(),
    })
}

/// Returns the region to image mapping published for `version`
pub async fn images_for_version(
    store: &dyn ObjectStore,
    version: &str,
) -> Result<Manifest, ManifestError> {
    let key = StorageKey::for_version(&VersionId::parse(version));
    fetch_manifest(store, &key).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::error::StoreError;
    use crate::version::store::MockObjectStore;
    use mockall::predicate::eq;

    fn listed_store() -> MockObjectStore {
        let mut store = MockObjectStore::new();
        store.expect_list_keys().returning(|_| {
            Ok(vec![
                "metavisor-2-0-1-x/amis.json".to_string(),
                "metavisor-2-1-0-y/amis.json".to_string(),
                "metavisor-2-1-0-y/other.txt".to_string(),
            ])
        });
        store
    }

    #[tokio::test]
    async fn build_catalog_lists_versions_and_resolves_latest() {
        let mut store = listed_store();
        store
            .expect_get_object()
            .with(eq("latest/amis.json"))
            .returning(|_| Ok(br#"{"us-west-2":"ami-123"}"#.to_vec()));
        store
            .expect_get_object()
            .with(eq("metavisor-2-1-0-y/amis.json"))
            .returning(|_| Ok(br#"{"us-west-2":"ami-123"}"#.to_vec()));
        store
            .expect_get_object()
            .with(eq("metavisor-2-0-1-x/amis.json"))
            .returning(|_| Ok(br#"{"us-west-2":"ami-999"}"#.to_vec()));

        let catalog = build_catalog(&store, &StoreConfig::default()).await.unwrap();

        assert_eq!(
            catalog,
            VersionCatalog {
                latest: "metavisor-2-1-0-y".to_string(),
                versions: vec![
                    "metavisor-2-1-0-y".to_string(),
                    "metavisor-2-0-1-x".to_string()
                ],
            }
        );
        assert!(catalog.is_latest("metavisor-2-1-0-y"));
    }

    #[tokio::test]
    async fn build_catalog_leaves_latest_empty_when_latest_fetch_fails() {
        let mut store = listed_store();
        store
            .expect_get_object()
            .returning(|key| Err(StoreError::NotFound(key.to_string())));

        let catalog = build_catalog(&store, &StoreConfig::default()).await.unwrap();

        assert_eq!(catalog.latest(), None);
        assert_eq!(
            catalog.versions,
            vec![
                "metavisor-2-1-0-y".to_string(),
                "metavisor-2-0-1-x".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn build_catalog_fails_when_listing_fails() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_keys()
            .returning(|_| Err(StoreError::InvalidResponse("Unexpected status: 500".to_string())));
        store.expect_get_object().never();

        let result = build_catalog(&store, &StoreConfig::default()).await;

        assert!(matches!(
            result,
            Err(CatalogError::Listing(StoreError::InvalidResponse(_)))
        ));
    }

    #[test]
    fn catalog_serializes_with_published_field_names() {
        let catalog = VersionCatalog {
            latest: "metavisor-2-1-0-y".to_string(),
            versions: vec!["metavisor-2-1-0-y".to_string()],
        };

        assert_eq!(
            serde_json::to_value(&catalog).unwrap(),
            serde_json::json!({
                "latest_mv_version": "metavisor-2-1-0-y",
                "mv_versions": ["metavisor-2-1-0-y"]
            })
        );
    }

    #[tokio::test]
    async fn images_for_version_fetches_version_manifest() {
        let mut store = MockObjectStore::new();
        store
            .expect_get_object()
            .with(eq("metavisor-2-1-0-y/amis.json"))
            .times(1)
            .returning(|_| Ok(br#"{"us-west-2":"ami-123","eu-west-1":"ami-456"}"#.to_vec()));

        let manifest = images_for_version(&store, "metavisor-2-1-0-y").await.unwrap();

        assert_eq!(manifest.image("eu-west-1"), Some("ami-456"));
        assert_eq!(manifest.len(), 2);
    }
}
