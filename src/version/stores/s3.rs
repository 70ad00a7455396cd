//! Amazon S3 store implementation
//!
//! Reads the bucket anonymously through the AWS SDK. A custom endpoint (any
//! S3-compatible service) switches the client to path-style addressing.

use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tracing::{debug, warn};

use crate::config::{FETCH_TIMEOUT_MS, StoreConfig};
use crate::version::error::StoreError;
use crate::version::store::ObjectStore;

/// Error codes S3 uses for a missing bucket or object
const NOT_FOUND_CODES: &[&str] = &["NoSuchKey", "NoSuchBucket", "NotFound"];

/// Maps an SDK failure onto a store error; `missing` names what a 404 refers to
fn map_sdk_error<E>(err: SdkError<E>, missing: &str) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());

    if err.code().is_some_and(|c| NOT_FOUND_CODES.contains(&c)) || status == Some(404) {
        return StoreError::NotFound(missing.to_string());
    }

    if err.code() == Some("SlowDown") || matches!(status, Some(429) | Some(503)) {
        let retry_after = err
            .raw_response()
            .and_then(|r| r.headers().get("retry-after"))
            .and_then(|v| v.parse().ok());
        return StoreError::RateLimited {
            retry_after_secs: retry_after,
        };
    }

    let message = DisplayErrorContext(&err).to_string();
    warn!("S3 request failed: {}", message);
    StoreError::Request(message)
}

/// Store implementation for an S3 bucket
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Wraps an already configured SDK client
    pub fn new(client: Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    /// Builds an unsigned client for the bucket described by `config`
    pub async fn from_config(config: &StoreConfig) -> Self {
        let timeouts = TimeoutConfig::builder()
            .operation_attempt_timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .no_credentials()
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts))
            .timeout_config(timeouts);

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        debug!(
            "Using S3 bucket {} in {} (endpoint: {:?})",
            config.bucket, config.region, config.endpoint
        );

        Self::new(Client::from_conf(s3_config), &config.bucket)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        let mut page_count = 0usize;

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| map_sdk_error(e, &self.bucket))?;
            page_count += 1;
            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));
        }

        debug!(
            "Listed {} keys under {:?} in {} page(s)",
            keys.len(),
            prefix,
            page_count
        );

        Ok(keys)
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        debug!("Fetching object {}/{}", self.bucket, key);

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, key))?;

        let body = output.body.collect().await.map_err(|e| {
            StoreError::InvalidResponse(format!("Failed to read body of {}: {}", key, e))
        })?;

        Ok(body.into_bytes().to_vec())
    }
}
