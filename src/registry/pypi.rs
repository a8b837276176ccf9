//! PyPI Simple API adapter
//!
//! Fetches the versions of a project from one or more package indexes using
//! the JSON form of the Simple Repository API.
//! API endpoint: {index}/{canonical-name}/

use crate::domain::{canonicalize_name, Version};
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Default package index
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/simple";

/// Media type for the JSON Simple API
const SIMPLE_JSON_ACCEPT: &str = "application/vnd.pypi.simple.v1+json";

const SDIST_SUFFIXES: [&str; 5] = [".tar.gz", ".tar.bz2", ".tgz", ".zip", ".tar"];

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    index_urls: Vec<String>,
}

/// Project page of the Simple API
#[derive(Debug, Deserialize)]
struct SimpleProject {
    /// All versions of the project (API version 1.1+)
    #[serde(default)]
    versions: Vec<String>,
    /// Distribution files
    #[serde(default)]
    files: Vec<SimpleFile>,
}

#[derive(Debug, Deserialize)]
struct SimpleFile {
    filename: String,
}

impl PyPIAdapter {
    /// Create a new adapter querying pypi.org
    pub fn new(client: HttpClient) -> Self {
        Self::with_index_urls(client, vec![DEFAULT_INDEX_URL.to_string()])
    }

    /// Create a new adapter querying the given indexes in order
    pub fn with_index_urls(client: HttpClient, index_urls: Vec<String>) -> Self {
        Self { client, index_urls }
    }

    pub fn index_urls(&self) -> &[String] {
        &self.index_urls
    }

    /// Build the project URL on one index
    fn build_url(index_url: &str, package: &str) -> String {
        format!(
            "{}/{}/",
            index_url.trim_end_matches('/'),
            canonicalize_name(package)
        )
    }
}

/// Version strings listed on a project page
fn project_versions(package: &str, project: SimpleProject) -> Vec<String> {
    if !project.versions.is_empty() {
        return project.versions;
    }
    let canonical = canonicalize_name(package);
    project
        .files
        .iter()
        .filter_map(|file| version_from_filename(&canonical, &file.filename))
        .collect()
}

/// Extract the version from a wheel or sdist filename
fn version_from_filename(canonical: &str, filename: &str) -> Option<String> {
    if let Some(stem) = filename.strip_suffix(".whl") {
        return stem.split('-').nth(1).map(str::to_string);
    }

    let stem = SDIST_SUFFIXES
        .iter()
        .find_map(|suffix| filename.strip_suffix(suffix))?;
    let (name, version) = stem.rsplit_once('-')?;
    (canonicalize_name(name) == canonical).then(|| version.to_string())
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        "package index"
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<Version>, RegistryError> {
        let mut found = false;
        let mut versions = Vec::new();

        for index_url in &self.index_urls {
            let url = Self::build_url(index_url, package);
            let project: SimpleProject = match self
                .client
                .get_json(&url, SIMPLE_JSON_ACCEPT, package, self.registry_name())
                .await
            {
                Ok(project) => project,
                Err(RegistryError::PackageNotFound { .. }) => {
                    debug!("{} not found on {}", package, index_url);
                    continue;
                }
                Err(e) => return Err(e),
            };
            found = true;

            for raw in project_versions(package, project) {
                match Version::parse(&raw) {
                    Ok(version) => versions.push(version),
                    Err(e) => debug!("skipping {} release: {}", package, e),
                }
            }
        }

        if !found {
            return Err(RegistryError::package_not_found(package, self.registry_name()));
        }
        if versions.is_empty() {
            return Err(RegistryError::no_releases(package, self.registry_name()));
        }

        versions.sort();
        versions.dedup();
        Ok(versions)
    }
}
