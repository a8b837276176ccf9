//! Package index adapters for fetching available versions
//!
//! This module provides:
//! - HTTP client shared foundation
//! - PyPI Simple API adapter supporting extra indexes

mod client;
mod pypi;

pub use client::HttpClient;
pub use pypi::{PyPIAdapter, DEFAULT_INDEX_URL};

use crate::domain::Version;
use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for package index adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name used in messages
    fn registry_name(&self) -> &'static str;

    /// Fetch every published version of a package, sorted ascending
    async fn fetch_versions(&self, package: &str) -> Result<Vec<Version>, RegistryError>;
}
