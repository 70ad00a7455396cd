//! Command-line client for published Metavisor versions
//!
//! - [`version`]: Version discovery, ordering and latest resolution
//! - [`cleanup`]: Caller-owned deferred cleanup actions
//! - [`config`]: Constants, store configuration and data paths
//! - [`logging`]: Tracing subscriber setup

pub mod cleanup;
pub mod config;
pub mod logging;
pub mod version;
