use thiserror::Error;

/// Errors raised by an object store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while fetching a single manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to fetch manifest {key}: {source}")]
    Fetch {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to decode manifest {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    /// Storage key of the manifest that failed
    pub fn key(&self) -> &str {
        match self {
            Self::Fetch { key, .. } | Self::Decode { key, .. } => key,
        }
    }
}

/// Errors raised while resolving which version is tagged latest
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Could not read latest manifest: {0}")]
    Latest(#[source] ManifestError),

    #[error("Could not read version manifest: {0}")]
    Version(#[source] ManifestError),

    #[error("No version matches the latest manifest")]
    NoMatchingVersion,
}

/// Errors that prevent a catalog from being built
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to list versions: {0}")]
    Listing(#[from] StoreError),
}
