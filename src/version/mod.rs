//! Version discovery layer for published Metavisor builds
//!
//! This module lists the versions published to the object store, orders them,
//! and works out which one is currently tagged latest.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│   Lister    │────▶│ ObjectStore │
//! │ (assemble)  │     │ (versions)  │     │  (list/get) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       ▲
//!        ▼                                       │
//! ┌─────────────┐                         ┌─────────────┐
//! │  Resolver   │────────────────────────▶│  Manifest   │
//! │  (latest)   │                         │   (fetch)   │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Builds the version catalog, tolerating resolution failures
//! - [`error`]: Error types for store, manifest, resolution and catalog operations
//! - [`id`]: Version identifier parsing and ordering
//! - [`lister`]: Reduces object keys to a sorted list of versions
//! - [`manifest`]: Manifest type, storage keys and fetching
//! - [`resolver`]: Content-based latest version resolution
//! - [`store`]: Object store trait
//! - [`stores`]: Concrete object store implementations (S3)

pub mod catalog;
pub mod error;
pub mod id;
pub mod lister;
pub mod manifest;
pub mod resolver;
pub mod store;
pub mod stores;
