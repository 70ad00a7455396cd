use std::path::PathBuf;

// =============================================================================
// Object store constants
// =============================================================================

/// Bucket holding the published Metavisor builds
pub const DEFAULT_BUCKET: &str = "solo-brkt-prod-net";

/// Region the bucket lives in
pub const DEFAULT_REGION: &str = "us-west-2";

/// Every published version key starts with this prefix
pub const VERSION_PREFIX: &str = "metavisor";

/// Name of the manifest object stored under each version directory
pub const MANIFEST_FILE: &str = "amis.json";

/// Directory of the well-known "latest" manifest
pub const LATEST_DIR: &str = "latest";

// =============================================================================
// Time and concurrency constants
// =============================================================================

/// Timeout for a single object store request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Number of version manifests prefetched while resolving the latest version
pub const DEFAULT_RESOLVE_CONCURRENCY: usize = 4;

/// Attempts per object store request, including the first one
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

// =============================================================================
// Environment variables
// =============================================================================

pub const ENV_S3_ENDPOINT: &str = "MV_S3_ENDPOINT";
pub const ENV_S3_BUCKET: &str = "MV_S3_BUCKET";
pub const ENV_S3_REGION: &str = "MV_S3_REGION";
pub const ENV_S3_MAX_ATTEMPTS: &str = "MV_S3_MAX_ATTEMPTS";
pub const ENV_RESOLVE_CONCURRENCY: &str = "MV_RESOLVE_CONCURRENCY";

/// Always output JSON where applicable
pub const ENV_OUTPUT_JSON: &str = "MV_OUTPUT_JSON";

/// Object store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub bucket: String,
    pub region: String,
    /// Custom S3-compatible endpoint. When set, path-style addressing is used.
    pub endpoint: Option<String>,
    pub prefix: String,
    /// Retry budget handed to the S3 client
    pub max_attempts: u32,
    /// Upper bound on manifests fetched ahead while resolving "latest"
    pub resolve_concurrency: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            prefix: VERSION_PREFIX.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            resolve_concurrency: DEFAULT_RESOLVE_CONCURRENCY,
        }
    }
}

impl StoreConfig {
    /// Builds the configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            bucket: non_empty(ENV_S3_BUCKET).unwrap_or(defaults.bucket),
            region: non_empty(ENV_S3_REGION).unwrap_or(defaults.region),
            endpoint: non_empty(ENV_S3_ENDPOINT).map(|e| e.trim_end_matches('/').to_string()),
            prefix: defaults.prefix,
            max_attempts: non_empty(ENV_S3_MAX_ATTEMPTS)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_attempts),
            resolve_concurrency: non_empty(ENV_RESOLVE_CONCURRENCY)
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.resolve_concurrency),
        }
    }

}

/// Returns the path to the data directory for metavisor-cli.
/// Uses $XDG_DATA_HOME/metavisor-cli if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/metavisor-cli,
/// or ./metavisor-cli if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("metavisor-cli")
}
