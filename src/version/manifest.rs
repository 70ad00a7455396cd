//! Per-version image manifests
//!
//! Each published version stores an `amis.json` object mapping a region name
//! to the image built for that region. A copy of the newest one is kept under
//! `latest/amis.json`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LATEST_DIR, MANIFEST_FILE};
use crate::version::error::ManifestError;
use crate::version::id::VersionId;
use crate::version::store::ObjectStore;

/// Region name to image identifier mapping.
///
/// Only flat string-to-string JSON objects decode successfully. Equality is
/// content equality: same regions, same images, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, String>);

impl Manifest {
    pub fn new(images: BTreeMap<String, String>) -> Self {
        Self(images)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Image identifier for `region`, if one was published
    pub fn image(&self, region: &str) -> Option<&str> {
        self.0.get(region).map(String::as_str)
    }

    /// Iterates `(region, image)` pairs ordered by region
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(r, i)| (r.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Manifest {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Location of a manifest object in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key of the well-known latest manifest
    pub fn latest() -> Self {
        Self(format!("{}/{}", LATEST_DIR, MANIFEST_FILE))
    }

    /// Key of the manifest published for `version`
    pub fn for_version(version: &VersionId) -> Self {
        Self(format!("{}/{}", version.as_str(), MANIFEST_FILE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fetches and decodes the manifest stored at `key`
pub async fn fetch_manifest(
    store: &dyn ObjectStore,
    key: &StorageKey,
) -> Result<Manifest, ManifestError> {
    let body = store
        .get_object(key.as_str())
        .await
        .map_err(|source| ManifestError::Fetch {
            key: key.to_string(),
            source,
        })?;

    let manifest = Manifest::from_slice(&body).map_err(|source| ManifestError::Decode {
        key: key.to_string(),
        source,
    })?;

    debug!("Fetched manifest {} with {} regions", key, manifest.len());

    Ok(manifest)
}
