//! Enumerates the published versions in the object store

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::version::error::StoreError;
use crate::version::id::{VersionId, sort_descending};
use crate::version::store::ObjectStore;

/// Reduces object keys to the distinct version directories they live in
pub fn versions_from_keys<I, S>(keys: I) -> Vec<VersionId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = keys
        .into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            let version = key.split('/').next().unwrap_or(key);
            (!version.is_empty()).then(|| version.to_string())
        })
        .collect();

    let mut versions: Vec<VersionId> = unique.iter().map(|v| VersionId::parse(v)).collect();

    for version in versions.iter().filter(|v| !v.is_well_formed()) {
        warn!(
            "Version {} has non-numeric components; ordering it as {}.{}.{}",
            version,
            version.major(),
            version.minor(),
            version.build()
        );
    }

    sort_descending(&mut versions);
    versions
}

/// Lists every version under `prefix`, newest first
pub async fn list_versions(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<VersionId>, StoreError> {
    let keys = store.list_keys(prefix).await?;
    let key_count = keys.len();

    let versions = versions_from_keys(keys);
    debug!(
        "Found {} versions in {} objects under {:?}",
        versions.len(),
        key_count,
        prefix
    );

    Ok(versions)
}
